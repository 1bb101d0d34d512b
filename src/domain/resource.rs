use crate::utils::error::AppError;
use serde::Serialize;

/// Tri-state wrapper every data-producing operation hands back to callers.
///
/// A request starts as `Loading` and moves at most once to `Success` or
/// `Failure`. A new request starts a new lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Resource<T> {
    Loading,
    Success(T),
    Failure(Option<AppError>),
}

impl<T> Resource<T> {
    pub fn loading() -> Self {
        Resource::Loading
    }

    pub fn success(data: T) -> Self {
        Resource::Success(data)
    }

    pub fn failure(cause: Option<AppError>) -> Self {
        Resource::Failure(cause)
    }

    pub fn failed(err: AppError) -> Self {
        Resource::Failure(Some(err))
    }

    /// Reduces the active variant to a single value.
    pub fn fold<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(Option<AppError>) -> R,
        on_loading: impl FnOnce() -> R,
    ) -> R {
        match self {
            Resource::Success(data) => on_success(data),
            Resource::Failure(cause) => on_failure(cause),
            Resource::Loading => on_loading(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Failure(cause) => Resource::Failure(cause),
            Resource::Loading => Resource::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Resource::Failure(_))
    }

    /// Whether this value ends a request's lifecycle.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Resource::Failure(cause) => cause.as_ref(),
            _ => None,
        }
    }
}

impl<T> From<Result<T, AppError>> for Resource<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Resource::Success(data),
            Err(err) => Resource::Failure(Some(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(resource: Resource<u32>) -> String {
        resource.fold(
            |n| format!("ok:{}", n),
            |cause| match cause {
                Some(err) => format!("err:{}", err),
                None => "err:none".to_string(),
            },
            || "loading".to_string(),
        )
    }

    #[test]
    fn test_fold_dispatches_on_active_variant() {
        assert_eq!(describe(Resource::success(3)), "ok:3");
        assert_eq!(describe(Resource::loading()), "loading");
        assert_eq!(describe(Resource::failure(None)), "err:none");
        assert_eq!(
            describe(Resource::failed(AppError::NotFoundError)),
            "err:Not found"
        );
    }

    #[test]
    fn test_map_preserves_non_success_variants() {
        assert_eq!(Resource::success(2).map(|n| n * 10), Resource::success(20));
        assert_eq!(Resource::<u32>::loading().map(|n| n * 10), Resource::Loading);
        assert_eq!(
            Resource::<u32>::failed(AppError::NetworkError).map(|n| n * 10),
            Resource::Failure(Some(AppError::NetworkError))
        );
    }

    #[test]
    fn test_from_result_and_accessors() {
        let ok: Resource<u32> = Ok(7).into();
        assert!(ok.is_success());
        assert!(ok.is_terminal());
        assert_eq!(ok.data(), Some(&7));

        let err: Resource<u32> = Err(AppError::NotFoundError).into();
        assert!(err.is_failure());
        assert_eq!(err.error(), Some(&AppError::NotFoundError));
        assert!(!Resource::<u32>::loading().is_terminal());
    }
}

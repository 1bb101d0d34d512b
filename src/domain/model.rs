use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

impl Subject {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A named phase of an olympiad. The date range is not validated; an end
/// date before the start date is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Olympiad {
    pub id: i64,
    pub name: String,
    pub subjects: Vec<Subject>,
    pub min_grade: Option<u32>,
    pub max_grade: Option<u32>,
    pub stages: Vec<Stage>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl Olympiad {
    /// An absent bound is open on that side.
    pub fn accepts_grade(&self, grade: u32) -> bool {
        self.min_grade.map_or(true, |min| min <= grade)
            && self.max_grade.map_or(true, |max| grade <= max)
    }

    pub fn has_subject(&self, subject_id: i64) -> bool {
        self.subjects.iter().any(|s| s.id == subject_id)
    }

    pub fn grade_range_label(&self) -> String {
        match (self.min_grade, self.max_grade) {
            (Some(min), Some(max)) if min == max => format!("grade {}", min),
            (Some(min), Some(max)) => format!("{}-{}", min, max),
            (Some(min), None) => format!("{}+", min),
            (None, Some(max)) => format!("up to {}", max),
            (None, None) => "all grades".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl PaginationMetadata {
    /// Derives `total_pages` as `ceil(total_items / page_size)`; a zero page
    /// size yields zero pages.
    pub fn new(total_items: usize, current_page: usize, page_size: usize) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };

        Self {
            total_items,
            total_pages,
            current_page,
            page_size,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub meta: PaginationMetadata,
}

impl<T> PaginatedResponse<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

use futures::StreamExt;
use httpmock::prelude::*;
use olympiad_catalog::core::use_cases::{
    GetAvailableSubjectsUseCase, GetOlympiadByIdUseCase, GetPaginatedOlympiadsUseCase,
};
use olympiad_catalog::{
    AppError, CatalogRepository, HttpDataSource, OlympiadFilter, OlympiadRepository, Resource,
};
use std::sync::Arc;
use std::time::Duration;

fn catalog_json() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "name": "Euler Mathematics Olympiad",
            "subjects": [{"id": 1, "name": "Mathematics"}],
            "min_grade": 5,
            "max_grade": 8,
            "stages": [
                {"name": "Distance round", "start_date": "2024-11-01", "end_date": "2024-11-20"},
                {"name": "Final", "start_date": "2025-03-10", "end_date": "not-a-date"}
            ],
            "keywords": "algebra, combinatorics"
        },
        {
            "id": 2,
            "name": "Physics Challenge",
            "subjects": [{"id": 2, "name": "Physics"}],
            "min_grade": 9,
            "max_grade": 11,
            "description": "Experimental and theoretical rounds"
        },
        {
            "id": 3,
            "name": "Open Informatics Cup",
            "subjects": [{"id": 4, "name": "Informatics"}, {"id": 1, "name": "Mathematics"}],
            "min_grade": 7,
            "description": "Team programming with a mathematics track"
        },
        {
            "id": 4,
            "name": "History Quiz"
        }
    ])
}

fn repository(server: &MockServer) -> Arc<dyn OlympiadRepository> {
    let source = HttpDataSource::new(server.base_url(), Duration::from_secs(5)).unwrap();
    Arc::new(CatalogRepository::new(source))
}

#[tokio::test]
async fn test_paginated_query_over_http() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/olympiads");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(catalog_json());
    });

    let use_case = GetPaginatedOlympiadsUseCase::new(repository(&server));
    let filter = OlympiadFilter::default()
        .with_query("mathematics")
        .with_grades([7]);

    let emitted: Vec<_> = use_case.execute(1, 10, Some(filter)).collect().await;

    api_mock.assert();
    assert_eq!(emitted.len(), 2);
    assert!(emitted[0].is_loading());
    let page = emitted[1].data().unwrap();
    let ids: Vec<i64> = page.items.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(page.meta.total_items, 2);
    assert_eq!(page.meta.total_pages, 1);
}

#[tokio::test]
async fn test_subject_and_grade_filters_over_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/olympiads");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(catalog_json());
    });

    let use_case = GetPaginatedOlympiadsUseCase::new(repository(&server));
    let filter = OlympiadFilter::default().with_grades([10]).with_subjects([1, 2]);

    let emitted: Vec<_> = use_case.execute(1, 1, Some(filter)).collect().await;
    let page = emitted[1].data().unwrap();

    // Physics (9-11) and Informatics (7+) both accept grade 10
    assert_eq!(page.meta.total_items, 2);
    assert_eq!(page.meta.total_pages, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, 2);
}

#[tokio::test]
async fn test_unparseable_stage_date_does_not_fail_record() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/olympiads/1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(catalog_json()[0].clone());
    });

    let olympiad = GetOlympiadByIdUseCase::new(repository(&server))
        .execute(1)
        .await;

    let olympiad = olympiad.data().unwrap();
    assert_eq!(olympiad.stages.len(), 2);
    assert!(olympiad.stages[1].start_date.is_some());
    assert!(olympiad.stages[1].end_date.is_none());
}

#[tokio::test]
async fn test_non_string_stage_date_keeps_whole_catalog() {
    let server = MockServer::start();
    let mut payload = catalog_json();
    payload[1]["stages"] = serde_json::json!([{"name": "Final", "start_date": 20250301}]);
    payload[2]["min_grade"] = serde_json::json!(-1);
    server.mock(|when, then| {
        when.method(GET).path("/olympiads");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(payload);
    });

    let emitted: Vec<_> = repository(&server).get_all_olympiads().collect().await;

    let olympiads = emitted[1].data().unwrap();
    assert_eq!(olympiads.len(), 4);
    assert_eq!(olympiads[1].stages[0].start_date, None);
    assert_eq!(olympiads[2].min_grade, None);
}

#[tokio::test]
async fn test_missing_olympiad_is_not_found() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/olympiads/404");
        then.status(404);
    });

    let result = GetOlympiadByIdUseCase::new(repository(&server))
        .execute(404)
        .await;

    api_mock.assert();
    assert_eq!(result, Resource::failed(AppError::NotFoundError));
}

#[tokio::test]
async fn test_server_failure_is_server_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/olympiads");
        then.status(500).body("database unavailable");
    });

    let subjects = GetAvailableSubjectsUseCase::new(repository(&server))
        .execute()
        .await;

    assert_eq!(
        subjects,
        Resource::failed(AppError::server("database unavailable"))
    );
}

#[tokio::test]
async fn test_malformed_payload_is_data_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/olympiads");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{"id": "one"}]));
    });

    let emitted: Vec<_> = repository(&server).get_all_olympiads().collect().await;

    assert!(matches!(
        emitted[1].error(),
        Some(AppError::DataError { .. })
    ));
}

#[tokio::test]
async fn test_retry_is_an_explicit_second_request() {
    let server = MockServer::start();
    let mut failing = server.mock(|when, then| {
        when.method(GET).path("/olympiads");
        then.status(503);
    });

    let repo = repository(&server);
    let first: Vec<_> = repo.get_all_olympiads().collect().await;
    assert!(first[1].is_failure());
    failing.assert_hits(1);
    failing.delete();

    server.mock(|when, then| {
        when.method(GET).path("/olympiads");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(catalog_json());
    });

    let second: Vec<_> = repo.get_all_olympiads().collect().await;
    assert_eq!(second[1].data().map(Vec::len), Some(4));
}

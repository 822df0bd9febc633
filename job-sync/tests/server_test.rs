mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{init_tracing, job, opening, test_config, FakeFeed, FakeStore};
use job_sync::{build_router, AppState, SyncOrchestrator};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

fn server_with(feed: FakeFeed, store: Arc<FakeStore>) -> TestServer {
    let orchestrator = SyncOrchestrator::new(test_config(), Arc::new(feed), store);
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn sync_returns_report_with_cache_header() {
    init_tracing();
    let store = Arc::new(FakeStore::with_items(vec![opening("1", "a"), opening("2", "stale")]));
    let server = server_with(FakeFeed::with_jobs(vec![job("a"), job("b")]), store);

    let response = server.get("/sync").await;

    response.assert_status_ok();
    assert_eq!(response.header("cache-control"), "s-maxage=600");
    let json: Value = response.json();
    assert_eq!(json["status"], 200);
    assert_eq!(json["message"], "sync complete");
    let body = &json["body"];
    assert_eq!(body["newJobs"][0]["slug"], "b");
    assert_eq!(body["newJobs"][0]["type"], "Full-Time");
    assert_eq!(body["jobsToRemove"][0]["fieldData"]["slug"], "stale");
    assert_eq!(body["addedJobsOutput"][0]["fieldData"]["url"], "b");
    assert_eq!(body["removedJobsOutput"][0]["status"], "removed");
    assert_eq!(body["removedJobsOutput"][0]["itemId"], "2");
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn api_path_is_an_alias() {
    init_tracing();
    let server = server_with(FakeFeed::with_jobs(vec![job("a")]), Arc::new(FakeStore::with_items(vec![opening("1", "a")])));

    let response = server.get("/api/sync").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["body"]["newJobs"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn partial_failure_is_multi_status() {
    init_tracing();
    let mut store = FakeStore::with_items(vec![opening("0", "a"), opening("1", "x"), opening("2", "y")]);
    store.fail_deletes = HashSet::from(["1".to_string()]);
    let server = server_with(FakeFeed::with_jobs(vec![job("a")]), Arc::new(store));

    let response = server.get("/sync").await;

    response.assert_status(StatusCode::MULTI_STATUS);
    assert_eq!(response.header("cache-control"), "no-store");
    let json: Value = response.json();
    assert_eq!(json["status"], 207);
    let removed = json["body"]["removedJobsOutput"].as_array().unwrap();
    assert_eq!(removed[0]["status"], "failed");
    assert_eq!(removed[1]["status"], "removed");
    assert_eq!(json["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn fetch_failure_is_bad_gateway() {
    init_tracing();
    let server = server_with(FakeFeed::failing(), Arc::new(FakeStore::default()));

    let response = server.get("/sync").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.header("cache-control"), "no-store");
    let json: Value = response.json();
    assert_eq!(json["status"], 502);
    assert_eq!(json["error"]["kind"], "fetch_failed");
    assert!(json.get("body").is_none());
}

#[tokio::test]
async fn teardown_needs_confirmation_parameter() {
    init_tracing();
    let store = Arc::new(FakeStore::with_items(vec![opening("1", "x")]));
    let server = server_with(FakeFeed::with_jobs(Vec::new()), store.clone());

    let refused = server.get("/sync").await;
    refused.assert_status(StatusCode::PRECONDITION_FAILED);
    assert_eq!(store.delete_call_count(), 0);

    let confirmed = server.get("/sync").add_query_param("confirmTeardown", "true").await;
    confirmed.assert_status_ok();
    assert_eq!(store.delete_call_count(), 1);
}

#[tokio::test]
async fn dry_run_parameter_skips_writes() {
    init_tracing();
    let store = Arc::new(FakeStore::with_items(vec![opening("1", "x")]));
    let server = server_with(FakeFeed::with_jobs(vec![job("a")]), store.clone());

    let response = server.get("/sync").add_query_param("dryRun", "true").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["body"]["dryRun"], true);
    assert_eq!(json["body"]["newJobs"].as_array().unwrap().len(), 1);
    assert_eq!(store.create_call_count() + store.delete_call_count(), 0);
}

#[tokio::test]
async fn healthz_reports_ok() {
    let server = server_with(FakeFeed::with_jobs(Vec::new()), Arc::new(FakeStore::default()));

    let response = server.get("/healthz").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "ok");
}

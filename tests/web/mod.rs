use crate::helpers::*;
use actix_web::{http::StatusCode, test, web::Data, App};
use bigfile_explorer::{
    constants::SYNTHETIC_DATA_HEADER,
    dashboard::DashboardConfig,
    node::{NodeClient, NodeConfig},
    web::{configure, AppState},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn state(server: &MockServer, config: DashboardConfig) -> Arc<AppState> {
    let node = NodeClient::new(&NodeConfig {
        url: server.uri(),
        request_timeout: Duration::from_secs(5),
        insecure_tls: false,
    })
    .unwrap();
    Arc::new(AppState::new(Arc::new(node), config))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(App::new().app_data(Data::from($state)).configure(configure)).await
    };
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let resp =
            test::call_service(&$app, test::TestRequest::get().uri($uri).to_request()).await;
        let status: StatusCode = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn dashboard_end_to_end() {
    let server = MockServer::start().await;
    mount_info(&server, 100, 7).await;
    mount_chain(&server, 100, 15, 2).await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let (status, body) = get_json!(app, "/api/dashboard");
    assert_eq!(status, StatusCode::OK);

    let current = &body["current"];
    assert!(current["totalTransactions"].as_u64().unwrap() >= 30);
    assert!(current["tps"].as_f64().unwrap() >= 0.0);
    assert_eq!(current["height"], 100);
    assert_eq!(current["peerCount"], 7);

    let heights: Vec<u64> = body["recentBlocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["height"].as_u64().unwrap())
        .collect();
    assert_eq!(heights, (86..=100).rev().collect::<Vec<_>>());
    assert_eq!(body["recentBlocks"][0]["txCount"], 2);
    assert_eq!(
        body["recentBlocks"][0]["timestamp"],
        (GENESIS_TIMESTAMP + 100 * BLOCK_SPACING) * 1000
    );

    let trend = body["trends"]["transactions"]["data"].as_array().unwrap();
    assert_eq!(trend.len(), 15);

    let weave = &body["trends"]["weaveSize"];
    let points = weave["data"].as_array().unwrap();
    assert_eq!(points.first().unwrap()["value"], weave_at(86));
    assert_eq!(points.last().unwrap()["value"], weave_at(100));
    assert_eq!(weave["total24h"], weave_at(100));
}

#[actix_web::test]
async fn dashboard_is_cached_within_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_json(20, 3)))
        .expect(1)
        .mount(&server)
        .await;
    mount_chain(&server, 20, 5, 1).await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let first = get_json!(app, "/api/dashboard");
    let second = get_json!(app, "/api/dashboard");
    assert_eq!(first, second);
}

#[actix_web::test]
async fn dashboard_rebuilds_after_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_json(20, 3)))
        .expect(2)
        .mount(&server)
        .await;
    mount_chain(&server, 20, 5, 1).await;
    let config = DashboardConfig {
        cache_ttl: Duration::ZERO,
        ..Default::default()
    };
    let app = init_app!(state(&server, config));

    get_json!(app, "/api/dashboard");
    get_json!(app, "/api/dashboard");
}

#[actix_web::test]
async fn dashboard_fails_without_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let (status, body) = get_json!(app, "/api/dashboard");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error fetching dashboard data");
    assert!(body["details"].is_string());
}

#[actix_web::test]
async fn latest_blocks_descending() {
    let server = MockServer::start().await;
    mount_info(&server, 50, 4).await;
    mount_chain(&server, 50, 10, 1).await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let (status, body) = get_json!(app, "/api/blocks");
    assert_eq!(status, StatusCode::OK);
    let heights: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["height"].as_u64().unwrap())
        .collect();
    assert_eq!(heights, (41..=50).rev().collect::<Vec<_>>());
}

#[actix_web::test]
async fn block_detail_by_height_and_hash() {
    let server = MockServer::start().await;
    mount_chain(&server, 10, 1, 2).await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let (status, by_height) = get_json!(app, "/api/block/10");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_height["hash"], "hash-10");
    assert_eq!(by_height["miner"], "miner-address");
    assert_eq!(by_height["txs"].as_array().unwrap().len(), 2);
    // no transaction bodies are mounted
    assert_eq!(by_height["transactions"].as_array().unwrap().len(), 0);

    let (status, by_hash) = get_json!(app, "/api/block/hash-10");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_hash, by_height);

    let (status, body) = get_json!(app, "/api/block/11");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Block not found");
}

#[actix_web::test]
async fn transaction_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tx/known"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "known",
            "data_size": "10",
            "reward": "5",
            "block_height": 9,
        })))
        .mount(&server)
        .await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let (status, tx) = get_json!(app, "/api/tx/known");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tx["data_size"], 10);
    assert_eq!(tx["fee"], "5");
    assert_eq!(tx["block_height"], 9);

    let (status, body) = get_json!(app, "/api/tx/missing");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Transaction not found");

    let (status, _) = get_json!(app, "/api/tx/bad%24id");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn transaction_count() {
    let server = MockServer::start().await;
    mount_info(&server, 10, 2).await;
    mount_chain(&server, 10, 1, 3).await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let (status, body) = get_json!(app, "/api/transactions/count");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastBlock"], 3);
    assert_eq!(body["pending"], 0);
}

#[actix_web::test]
async fn prometheus_metrics() {
    let server = MockServer::start().await;
    mount_info(&server, 100, 7).await;
    mount_chain(&server, 100, 1, 4).await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/metrics").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.contains("bigfile_height 100\n"));
    assert!(text.contains("bigfile_peers 7\n"));
    assert!(text.contains("bigfile_total_transactions 4\n"));
}

#[actix_web::test]
async fn synthetic_series_are_flagged() {
    let server = MockServer::start().await;
    mount_info(&server, 10, 9).await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    for uri in ["/api/metrics/historical", "/api/metrics/health"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(SYNTHETIC_DATA_HEADER).unwrap(),
            "true",
            "{uri}"
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["synthetic"], true, "{uri}");
    }
}

#[actix_web::test]
async fn block_series_oldest_first() {
    let server = MockServer::start().await;
    mount_info(&server, 30, 3).await;
    mount_chain(&server, 30, 24, 1).await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    for uri in [
        "/api/metrics/network-growth",
        "/api/metrics/transaction-rate",
        "/api/metrics/hash-rate",
    ] {
        let (status, body) = get_json!(app, uri);
        assert_eq!(status, StatusCode::OK, "{uri}");
        let points = body.as_array().unwrap();
        assert_eq!(points.len(), 24, "{uri}");
        assert_eq!(points[0]["height"], 7, "{uri}");
        assert_eq!(points[23]["height"], 30, "{uri}");
    }

    let (_, growth) = get_json!(app, "/api/metrics/network-growth");
    assert_eq!(growth[23]["size"], weave_at(30));
}

#[actix_web::test]
async fn block_without_txs_counts_zero() {
    let server = MockServer::start().await;
    mount_info(&server, 1, 1).await;
    Mock::given(method("GET"))
        .and(path("/block/height/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "indep_hash": "solo",
            "height": 1,
            "timestamp": GENESIS_TIMESTAMP,
        })))
        .mount(&server)
        .await;
    let app = init_app!(state(&server, DashboardConfig::default()));

    let (status, body) = get_json!(app, "/api/dashboard");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recentBlocks"][0]["txCount"], 0);
    assert_eq!(body["current"]["tps"], 0.01);
}

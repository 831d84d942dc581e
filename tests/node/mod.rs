use crate::helpers::*;
use bigfile_explorer::node::{NodeApi, NodeClient, NodeConfig, NodeError, TxRef};
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client(server: &MockServer) -> NodeClient {
    NodeClient::new(&NodeConfig {
        url: server.uri(),
        request_timeout: Duration::from_secs(5),
        insecure_tls: false,
    })
    .unwrap()
}

#[tokio::test]
async fn info_and_blocks() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_info(&server, 100, 7).await;
    mount_chain(&server, 100, 2, 3).await;
    let node = client(&server);

    let info = node.info().await?;
    assert_eq!(info.height, Some(100));
    assert_eq!(info.blocks, Some(101));
    assert_eq!(info.peers.count(), 7);

    let block = node.block_by_height(100).await?;
    assert_eq!(block.hash(), "hash-100");
    assert_eq!(block.size(), weave_at(100));
    assert_eq!(block.data_size(), 102_400);
    assert_eq!(block.tx_count(), 3);
    assert!(block.diff.is_some());

    let same = node.block_by_hash("hash-100").await?;
    assert_eq!(same.height(), 100);
    assert_eq!(node.current_block().await?.height(), 100);
    Ok(())
}

#[tokio::test]
async fn base_path_is_preserved() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/node/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_json(3, 1)))
        .mount(&server)
        .await;

    let node = NodeClient::new(&NodeConfig {
        url: format!("{}/node", server.uri()),
        ..Default::default()
    })?;
    assert_eq!(node.base_url().path(), "/node/");
    assert_eq!(node.info().await?.height, Some(3));
    Ok(())
}

#[tokio::test]
async fn missing_resources_are_not_found() {
    let server = MockServer::start().await;
    let node = client(&server);

    let err = node.transaction("unknown").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, NodeError::NotFound(p) if p == "tx/unknown"));
}

#[tokio::test]
async fn server_errors_keep_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).info().await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err, NodeError::Status(_, StatusCode::SERVICE_UNAVAILABLE)));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/block/height/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = client(&server).block_by_height(1).await.unwrap_err();
    assert!(matches!(err, NodeError::Decode(..)));
}

#[tokio::test]
async fn transaction_fields() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tx/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "owner": "owner-key",
            "target": "",
            "quantity": "0",
            "reward": "123456789012345678901234",
            "data_size": "2048",
            "data_root": "root",
            "tags": [{ "name": "Q29udGVudC1UeXBl", "value": "dGV4dC9wbGFpbg" }],
        })))
        .mount(&server)
        .await;

    let tx = client(&server).transaction("abc").await?;
    assert_eq!(tx.data_size, Some(2048));
    assert_eq!(tx.fee(), Some("123456789012345678901234"));
    assert_eq!(
        tx.tags[0].decoded(),
        ("Content-Type".to_string(), "text/plain".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn block_without_txs_field() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/block/height/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "indep_hash": "h5",
            "height": 5,
            "timestamp": 1_700_000_000u64,
        })))
        .mount(&server)
        .await;

    let block = client(&server).block_by_height(5).await?;
    assert_eq!(block.tx_count(), 0);
    assert!(block.txs.iter().all(|tx| matches!(tx, TxRef::Id(_))));
    assert_eq!(block.size(), 0);
    Ok(())
}

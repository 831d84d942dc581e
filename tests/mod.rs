mod node;
mod web;

pub mod helpers {
    use serde_json::{json, Value};
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
    pub const BLOCK_SPACING: u64 = 120;
    pub const GENESIS_WEAVE: u64 = 50_000_000_000;

    /// Chain weave after `height`, each block adding `1024 * height` bytes
    pub fn weave_at(height: u64) -> u64 {
        GENESIS_WEAVE + 1024 * height * (height + 1) / 2
    }

    pub fn info_json(height: u64, peers: u64) -> Value {
        json!({
            "network": "bigfile.N.1",
            "version": 5,
            "height": height,
            "current": format!("hash-{height}"),
            "blocks": height + 1,
            "peers": peers,
            "queue_length": 0,
        })
    }

    pub fn block_json(height: u64, txs: usize) -> Value {
        json!({
            "indep_hash": format!("hash-{height}"),
            "height": height,
            "timestamp": GENESIS_TIMESTAMP + height * BLOCK_SPACING,
            "previous_block": format!("hash-{}", height.saturating_sub(1)),
            "block_size": (1024 * height).to_string(),
            "weave_size": weave_at(height).to_string(),
            "diff": "115792089237316195423570985008687907853269984665640564039457584007908834672640",
            "reward_addr": "miner-address",
            "txs": (0..txs).map(|i| format!("tx-{height}-{i}")).collect::<Vec<_>>(),
        })
    }

    pub async fn mount_info(server: &MockServer, height: u64, peers: u64) {
        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(info_json(height, peers)))
            .mount(server)
            .await;
    }

    /// Mounts `count` blocks ending at `tip`, reachable by height and by hash
    pub async fn mount_chain(server: &MockServer, tip: u64, count: u64, txs: usize) {
        for height in (tip + 1 - count)..=tip {
            let body = block_json(height, txs);
            Mock::given(method("GET"))
                .and(path(format!("/block/height/{height}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
                .mount(server)
                .await;
            Mock::given(method("GET"))
                .and(path(format!("/block/hash/hash-{height}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/block/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(block_json(tip, txs)))
            .mount(server)
            .await;
    }
}

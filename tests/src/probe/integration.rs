#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use mcstat_common::batch::BatchResult;
use mcstat_common::config::Config;
use mcstat_common::error::ProbeError;
use mcstat_common::network::target::{DEFAULT_PORT, Target};
use mcstat_common::status::{ProbeResult, Status};
use mcstat_core::resolver::AddressResolver;
use mcstat_core::{JavaProber, probe_all};
use serde_json::json;
use tokio::net::{TcpListener, UdpSocket};
use tokio::time::Instant;

use crate::mock::{Behaviour, Handshake, MockNameserver, MockServer};

fn config(timeout: Duration) -> Config {
    Config {
        timeout,
        srv_lookup: false,
        nameserver: None,
        default_port: DEFAULT_PORT,
    }
}

fn owned(items: &[String]) -> Vec<String> {
    items.to_vec()
}

/// A port nobody listens on: bound once, then released.
async fn closed_port() -> u16 {
    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn reads_players_and_description() {
    let server: MockServer = MockServer::replying(json!({
        "version": {"name": "1.8.9", "protocol": 47},
        "players": {"max": 20, "online": 3},
        "description": "A Server"
    }))
    .await
    .unwrap();

    let prober: JavaProber = JavaProber::new(config(Duration::from_secs(2)));
    let status: Status = prober.query(&server.addr.to_string()).await.unwrap();

    assert_eq!(
        status,
        Status {
            max_players: 20,
            online_players: 3,
            description: "A Server".to_string(),
        }
    );

    let handshakes: Vec<Handshake> = server.handshakes();
    assert_eq!(handshakes.len(), 1);
    assert_eq!(handshakes[0].protocol_version, 47);
    assert_eq!(handshakes[0].host, "127.0.0.1");
    assert_eq!(handshakes[0].port, server.addr.port());
    assert_eq!(handshakes[0].next_state, 1);
}

#[tokio::test]
async fn flattens_rich_text_description() {
    let server: MockServer = MockServer::replying(json!({
        "players": {"max": 100, "online": 42},
        "description": {
            "text": "Hello ",
            "extra": [{"text": "World", "bold": true}, "!"]
        }
    }))
    .await
    .unwrap();

    let prober: JavaProber = JavaProber::new(config(Duration::from_secs(2)));
    let status: Status = prober.query(&server.addr.to_string()).await.unwrap();
    assert_eq!(status.description, "Hello World!");
    assert_eq!(status.online_players, 42);
}

#[tokio::test]
async fn truncated_frame_is_a_protocol_error() {
    let server: MockServer = MockServer::start(Behaviour::Truncated).await.unwrap();
    let prober: JavaProber = JavaProber::new(config(Duration::from_secs(2)));

    let err: ProbeError = prober.query(&server.addr.to_string()).await.unwrap_err();
    assert!(matches!(err, ProbeError::Protocol(_)), "{err}");
    assert!(err.to_string().starts_with("ProtocolError"));
}

#[tokio::test]
async fn wrong_packet_id_is_a_protocol_error() {
    let server: MockServer = MockServer::start(Behaviour::WrongPacketId).await.unwrap();
    let prober: JavaProber = JavaProber::new(config(Duration::from_secs(2)));

    let err: ProbeError = prober.query(&server.addr.to_string()).await.unwrap_err();
    assert!(matches!(err, ProbeError::Protocol(_)), "{err}");
}

#[tokio::test]
async fn invalid_json_is_a_protocol_error() {
    let server: MockServer = MockServer::start(Behaviour::Reply("{not json".to_string()))
        .await
        .unwrap();
    let prober: JavaProber = JavaProber::new(config(Duration::from_secs(2)));

    let err: ProbeError = prober.query(&server.addr.to_string()).await.unwrap_err();
    assert!(matches!(err, ProbeError::Protocol(_)), "{err}");
}

#[tokio::test]
async fn silent_server_times_out_within_budget() {
    let server: MockServer = MockServer::start(Behaviour::Silent).await.unwrap();
    let timeout: Duration = Duration::from_millis(300);
    let prober: JavaProber = JavaProber::new(config(timeout));

    let started: Instant = Instant::now();
    let err: ProbeError = prober.query(&server.addr.to_string()).await.unwrap_err();

    assert!(matches!(err, ProbeError::Timeout { .. }), "{err}");
    assert!(started.elapsed() < timeout + Duration::from_millis(500));
}

#[tokio::test]
async fn refused_port_is_a_connection_error() {
    let port: u16 = closed_port().await;
    let prober: JavaProber = JavaProber::new(config(Duration::from_secs(2)));

    let err: ProbeError = prober.query(&format!("127.0.0.1:{port}")).await.unwrap_err();
    assert!(matches!(err, ProbeError::Connection(_)), "{err}");
}

#[tokio::test]
async fn unroutable_host_fails_within_budget() {
    let timeout: Duration = Duration::from_millis(500);
    let prober: JavaProber = JavaProber::new(config(timeout));

    let started: Instant = Instant::now();
    let err: ProbeError = prober.query("10.255.255.1").await.unwrap_err();

    // Some sandboxes reject the route outright instead of dropping packets
    assert!(
        matches!(err, ProbeError::Timeout { .. } | ProbeError::Connection(_)),
        "{err}"
    );
    assert!(started.elapsed() < timeout + Duration::from_secs(1));
}

#[tokio::test]
async fn mixed_batch_keeps_input_order() {
    let up: MockServer = MockServer::replying(json!({
        "players": {"max": 10, "online": 1},
        "description": {"text": "up"}
    }))
    .await
    .unwrap();
    let silent: MockServer = MockServer::start(Behaviour::Silent).await.unwrap();
    let refused: u16 = closed_port().await;

    let addresses: Vec<String> = owned(&[
        silent.addr.to_string(),
        format!("127.0.0.1:{refused}"),
        String::new(),
        up.addr.to_string(),
    ]);
    let prober: Arc<JavaProber> = Arc::new(JavaProber::new(config(Duration::from_millis(400))));

    let started: Instant = Instant::now();
    let batch: BatchResult = probe_all(prober, &addresses).await;
    // Concurrent: the whole batch costs roughly one budget
    assert!(started.elapsed() < Duration::from_millis(1400));

    let keys: Vec<&str> = batch.keys().collect();
    assert_eq!(keys, addresses.iter().map(String::as_str).collect::<Vec<_>>());

    assert!(batch.get(&addresses[0]).unwrap().reason().unwrap().starts_with("TimeoutError"));
    assert!(batch.get(&addresses[1]).unwrap().reason().unwrap().starts_with("ConnectionError"));
    assert!(batch.get("").unwrap().reason().unwrap().starts_with("InvalidAddress"));
    assert_eq!(batch.get(&addresses[3]).unwrap().status().unwrap().description, "up");

    let body: serde_json::Value = serde_json::to_value(&batch).unwrap();
    assert_eq!(
        body[&addresses[3]],
        json!({"max_players": 10, "online_players": 1, "description": "up"})
    );
}

#[tokio::test]
async fn duplicate_addresses_collapse_to_one_entry() {
    let server: MockServer = MockServer::replying(json!({
        "players": {"max": 5, "online": 0},
        "description": ""
    }))
    .await
    .unwrap();
    let addr: String = server.addr.to_string();
    let prober: Arc<JavaProber> = Arc::new(JavaProber::new(config(Duration::from_secs(2))));

    let batch: BatchResult = probe_all(prober, &owned(&[addr.clone(), addr.clone()])).await;

    assert_eq!(batch.len(), 1);
    assert!(matches!(batch.get(&addr), Some(ProbeResult::Status(_))));
}

#[tokio::test]
async fn default_and_explicit_ports() {
    let resolver: AddressResolver = AddressResolver::new(&config(Duration::from_secs(1)));
    let deadline: Instant = Instant::now() + Duration::from_secs(1);

    let implicit: Target = resolver.resolve("mc.example.org", deadline).await.unwrap();
    assert_eq!(implicit, Target::new("mc.example.org", 25565));

    let explicit: Target = resolver.resolve("mc.example.org:25566", deadline).await.unwrap();
    assert_eq!(explicit, Target::new("mc.example.org", 25566));
}

#[tokio::test]
async fn srv_record_redirects_the_probe() {
    let server: MockServer = MockServer::replying(json!({
        "players": {"max": 64, "online": 7},
        "description": "behind srv"
    }))
    .await
    .unwrap();
    let nameserver: MockNameserver = MockNameserver::start(Some((server.addr.port(), "127.0.0.1")))
        .await
        .unwrap();

    let cfg: Config = Config {
        timeout: Duration::from_secs(2),
        srv_lookup: true,
        nameserver: Some(nameserver.addr),
        default_port: DEFAULT_PORT,
    };
    let prober: JavaProber = JavaProber::new(cfg);
    let status: Status = prober.query("play.example.org").await.unwrap();

    assert_eq!(status.description, "behind srv");
    assert_eq!(server.handshakes()[0].port, server.addr.port());
}

#[tokio::test]
async fn missing_srv_record_falls_back_to_default_port() {
    let nameserver: MockNameserver = MockNameserver::start(None).await.unwrap();
    let cfg: Config = Config {
        timeout: Duration::from_secs(1),
        srv_lookup: true,
        nameserver: Some(nameserver.addr),
        default_port: DEFAULT_PORT,
    };
    let resolver: AddressResolver = AddressResolver::new(&cfg);
    let deadline: Instant = Instant::now() + cfg.timeout;

    let target: Target = resolver.resolve("play.example.org", deadline).await.unwrap();
    assert_eq!(target, Target::new("play.example.org", 25565));
}

#[tokio::test]
async fn unanswered_srv_lookup_still_reaches_default_port() {
    let server: MockServer = MockServer::replying(json!({
        "players": {"max": 20, "online": 3},
        "description": "A Server"
    }))
    .await
    .unwrap();
    // Bound, never answers
    let silent: UdpSocket = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    let cfg: Config = Config {
        timeout: Duration::from_millis(800),
        srv_lookup: true,
        nameserver: Some(silent.local_addr().unwrap()),
        default_port: server.addr.port(),
    };
    let prober: JavaProber = JavaProber::new(cfg);
    let status: Status = prober.query("localhost").await.unwrap();

    assert_eq!(status.description, "A Server");
    assert_eq!(server.handshakes()[0].host, "localhost");
}

#[tokio::test]
async fn lost_srv_query_is_retried() {
    let server: MockServer = MockServer::replying(json!({
        "players": {"max": 8, "online": 2},
        "description": "second try"
    }))
    .await
    .unwrap();
    let nameserver: MockNameserver = MockNameserver::lossy(Some((server.addr.port(), "127.0.0.1")), 1)
        .await
        .unwrap();

    let cfg: Config = Config {
        timeout: Duration::from_secs(2),
        srv_lookup: true,
        nameserver: Some(nameserver.addr),
        default_port: DEFAULT_PORT,
    };
    let prober: JavaProber = JavaProber::new(cfg);
    let status: Status = prober.query("play.example.org").await.unwrap();

    assert_eq!(status.description, "second try");
}

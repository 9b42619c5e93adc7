//! End-to-end reconnaissance against a live cluster.
//!
//! Gated on `TEST_INTEGRATION`; see `test_helpers`.

use assert_matches::assert_matches;
use serde_json::json;

use krecon::cluster::{self, FetchPolicy, IdClaim};
use krecon::connect;
use krecon::session::{NOT_CONNECTED, Session};


/// Write a session config pointing at the test cluster.
fn seeded_session(bootstrap_brokers: &[String]) -> Session {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        json!({ "bootstrap.servers": bootstrap_brokers }).to_string(),
    )
    .unwrap();

    let mut session = Session::new();
    session.config.load(file.path()).unwrap();
    session
}

fn test_policy() -> FetchPolicy {
    FetchPolicy {
        timeout: test_helpers::TEST_TIMEOUT,
        ..FetchPolicy::default()
    }
}

#[tokio::test]
async fn connect_and_describe_cluster() {
    let cfg = maybe_skip_kafka_integration!();
    let mut session = seeded_session(&cfg.bootstrap_brokers);

    let outcome = connect::connect(&session.config).unwrap();
    assert!(outcome.generated_group_id.is_some());
    let applied = session.apply(outcome);
    assert!(applied.admin_error.is_none());
    assert!(applied.consumer_error.is_none());
    assert_ne!(session.broker, NOT_CONNECTED);

    let report = cluster::describe_cluster(
        session.admin.as_ref(),
        session.consumer.as_ref(),
        test_policy(),
    )
    .await
    .unwrap();

    assert!(!report.brokers.is_empty());
    let ids: Vec<i32> = report.brokers.iter().map(|b| b.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);

    assert_matches!(report.origin_broker, IdClaim::Valid(_));

    // Admin handle present, so every broker gets a config report, in
    // broker-id order.
    let config_ids: Vec<i32> = report
        .broker_configs
        .iter()
        .map(|c| c.broker_id)
        .collect();
    assert_eq!(config_ids, ids);
    for config in &report.broker_configs {
        let entries = config.entries.as_ref().unwrap();
        for entry in entries {
            assert!(cluster::CONFIG_NAME_ALLOW_LIST.contains(&entry.name.as_str()));
        }
    }
}

#[tokio::test]
async fn consumer_only_discovery_skips_broker_configs() {
    let cfg = maybe_skip_kafka_integration!();
    let mut session = seeded_session(&cfg.bootstrap_brokers);

    let outcome = connect::connect(&session.config).unwrap();
    session.apply(outcome);
    session.admin = None;

    let report = cluster::describe_cluster(
        session.admin.as_ref(),
        session.consumer.as_ref(),
        test_policy(),
    )
    .await
    .unwrap();

    assert!(!report.brokers.is_empty());
    assert!(report.broker_configs.is_empty());
}

#[tokio::test]
async fn reconnect_after_disconnect() {
    let cfg = maybe_skip_kafka_integration!();
    let mut session = seeded_session(&cfg.bootstrap_brokers);

    let outcome = connect::connect(&session.config).unwrap();
    session.apply(outcome);
    assert!(session.is_connected());

    let disconnected = session.disconnect();
    assert!(disconnected.admin && disconnected.consumer);
    assert_eq!(session.broker, NOT_CONNECTED);

    // The session survives teardown and reconnects within the same
    // process.
    let outcome = connect::connect(&session.config).unwrap();
    session.apply(outcome);
    assert!(session.is_connected());
}

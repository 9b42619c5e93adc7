//! Connection establishment policy.
//!
//! Turns the configuration store into an administrative and a consumer
//! handle against one selected bootstrap broker. The two constructions
//! are independent; partial success is a valid, observable end state.

use rand::prelude::*;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::client::{AdminHandle, ConsumerHandle};
use crate::config::{ConfigStore, value_to_string};

/// Configuration key naming the bootstrap address candidates.
pub const BOOTSTRAP_KEY: &str = "bootstrap.servers";

/// Configuration key naming the consumer group.
pub const GROUP_ID_KEY: &str = "group.id";

/// The only configuration keys copied onto the administrative connection.
///
/// Everything else is considered consumer-side and must not leak into the
/// admin client.
pub const ADMIN_OPTION_ALLOW_LIST: &[&str] = &[
    "security.protocol",
    "ssl.ca.location",
    "ssl.certificate.location",
    "ssl.key.location",
];

/// Precondition failure that aborts the whole connect operation before
/// any client is constructed.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("bootstrap server not configured")]
    BootstrapMissing,
}

/// Failure to construct one of the two client handles.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HandleError(#[from] rdkafka::error::KafkaError);

/// Everything a connect attempt produced, including per-handle failures.
#[derive(Debug)]
pub struct ConnectOutcome {
    /// The bootstrap address both handles were pointed at.
    pub bootstrap: String,

    /// Group id synthesized because the store had none. Reported to the
    /// operator and applied to the consumer, never written back to the
    /// store.
    pub generated_group_id: Option<String>,

    pub admin: Result<AdminHandle, HandleError>,

    pub consumer: Result<ConsumerHandle, HandleError>,
}

/// Build both client handles from the store.
///
/// Fails only on a missing bootstrap address; each handle construction
/// failure is captured in the outcome instead of propagating, so an admin
/// failure never prevents the consumer attempt or vice versa.
pub fn connect(config: &ConfigStore) -> Result<ConnectOutcome, ConnectError> {
    let generated_group_id = (!config.contains(GROUP_ID_KEY)).then(generate_group_id);

    let bootstrap = config
        .get(BOOTSTRAP_KEY)
        .and_then(resolve_bootstrap)
        .ok_or(ConnectError::BootstrapMissing)?;
    debug!(%bootstrap, "connecting");

    let admin = build_admin(config, &bootstrap);
    let consumer = build_consumer(config, &bootstrap, generated_group_id.as_deref());

    Ok(ConnectOutcome {
        bootstrap,
        generated_group_id,
        admin,
        consumer,
    })
}

/// A group id random enough to never collide across concurrent sessions
/// against the same cluster.
fn generate_group_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Pick the bootstrap address: one uniformly random candidate from a list
/// (any single seed broker bootstraps the full topology, and random
/// selection spreads load across seeds), or the scalar value as-is. An
/// empty candidate list resolves to nothing.
fn resolve_bootstrap(value: &Value) -> Option<String> {
    match value {
        Value::Array(candidates) => candidates.choose(&mut rand::rng()).map(value_to_string),
        other => Some(value_to_string(other)),
    }
}

fn build_admin(config: &ConfigStore, bootstrap: &str) -> Result<AdminHandle, HandleError> {
    let mut client_config = rdkafka::ClientConfig::new();
    for key in ADMIN_OPTION_ALLOW_LIST {
        if let Some(value) = config.get(key) {
            client_config.set(*key, value_to_string(value));
        }
    }
    client_config.set(BOOTSTRAP_KEY, bootstrap);
    Ok(AdminHandle::new(client_config.create()?))
}

fn build_consumer(
    config: &ConfigStore,
    bootstrap: &str,
    generated_group_id: Option<&str>,
) -> Result<ConsumerHandle, HandleError> {
    let mut client_config = rdkafka::ClientConfig::new();
    for (key, value) in config.entries() {
        client_config.set(key, value_to_string(value));
    }
    if let Some(group_id) = generated_group_id {
        client_config.set(GROUP_ID_KEY, group_id);
    }
    client_config.set(BOOTSTRAP_KEY, bootstrap);
    // Required so later stream reads can detect partition exhaustion
    // deterministically.
    client_config.set("enable.partition.eof", "true");
    Ok(ConsumerHandle::new(client_config.create()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use assert_matches::assert_matches;
    use serde_json::json;

    fn store_from(document: Value) -> ConfigStore {
        let Value::Object(map) = document else {
            panic!("test document must be an object");
        };
        let delta: BTreeMap<String, Value> = map.into_iter().collect();
        let mut store = ConfigStore::new();
        store.merge(&delta);
        store
    }

    #[test]
    fn missing_bootstrap_aborts_before_any_client() {
        let store = store_from(json!({"group.id": "recon"}));
        assert_matches!(connect(&store), Err(ConnectError::BootstrapMissing));
    }

    #[test]
    fn empty_candidate_list_counts_as_missing() {
        let store = store_from(json!({"bootstrap.servers": []}));
        assert_matches!(connect(&store), Err(ConnectError::BootstrapMissing));
    }

    #[test]
    fn scalar_bootstrap_is_used_verbatim() {
        assert_eq!(
            resolve_bootstrap(&json!("k1:9092")),
            Some("k1:9092".to_owned())
        );
    }

    #[test]
    fn list_bootstrap_resolves_to_one_candidate() {
        let candidates = json!(["k1:9092", "k2:9092", "k3:9092"]);
        for _ in 0..16 {
            let resolved = resolve_bootstrap(&candidates).unwrap();
            assert!(["k1:9092", "k2:9092", "k3:9092"].contains(&resolved.as_str()));
        }
    }

    #[test]
    fn group_id_is_synthesized_and_distinct_per_attempt() {
        let store = store_from(json!({"bootstrap.servers": "localhost:9092"}));

        let first = connect(&store).unwrap();
        let second = connect(&store).unwrap();

        let first_id = first.generated_group_id.unwrap();
        let second_id = second.generated_group_id.unwrap();
        assert_eq!(first_id.len(), 32);
        assert_ne!(first_id, second_id);
    }

    #[test]
    fn configured_group_id_is_kept() {
        let store = store_from(json!({
            "bootstrap.servers": "localhost:9092",
            "group.id": "recon",
        }));
        let outcome = connect(&store).unwrap();
        assert!(outcome.generated_group_id.is_none());
    }

    #[test]
    fn resolved_bootstrap_is_reported() {
        let store = store_from(json!({"bootstrap.servers": "localhost:9092"}));
        let outcome = connect(&store).unwrap();
        assert_eq!(outcome.bootstrap, "localhost:9092");
    }

    #[test]
    fn consumer_failure_leaves_admin_untouched() {
        // An unknown passthrough property is rejected at construction
        // time; the admin config only copies allow-listed keys, so only
        // the consumer sees it.
        let store = store_from(json!({
            "bootstrap.servers": "localhost:9092",
            "definitely.not.a.property": "x",
        }));

        let outcome = connect(&store).unwrap();
        assert!(outcome.admin.is_ok());
        assert!(outcome.consumer.is_err());
    }
}

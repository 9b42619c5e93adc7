//! External client capability used for all network interaction with the
//! cluster.
//!
//! The engine never speaks the wire protocol itself; it talks to the
//! cluster through the two traits below, backed by librdkafka via
//! [`rdkafka`]. Keeping the seam a trait also lets discovery logic be
//! exercised against fakes.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use rdkafka::ClientContext;
use rdkafka::client::Client;
use thiserror::Error;

use crate::metadata::{ConfigEntry, Metadata, MetadataBroker};

mod admin;
mod consumer;

pub use admin::AdminHandle;
pub use consumer::ConsumerHandle;

/// Timeout for reading the cluster and controller id claims. Both are
/// cached by librdkafka from the metadata request that just completed, so
/// this rarely waits at all.
const CLAIM_TIMEOUT: Duration = Duration::from_secs(1);

/// Failure talking to the cluster through a client handle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("client error: {0}")]
    Client(#[from] rdkafka::error::KafkaError),

    #[error("empty response from cluster")]
    EmptyResponse,

    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// Capability to query cluster topology.
pub trait TopologySource {
    /// Fetch a topology snapshot, bounded by `timeout`.
    fn fetch_topology(&self, timeout: Duration) -> impl Future<Output = Result<Metadata>> + Send;
}

/// Capability to query per-broker resource configuration.
///
/// Only administrative connections can serve this; consumer-only sessions
/// skip resource introspection.
pub trait BrokerConfigSource: TopologySource {
    /// Fetch the configuration of the broker resource `broker_id`, keyed
    /// by configuration name.
    fn fetch_broker_config(
        &self,
        broker_id: i32,
        timeout: Duration,
    ) -> impl Future<Output = Result<BTreeMap<String, ConfigEntry>>> + Send;
}

/// Assemble a snapshot from a fresh metadata response.
fn snapshot<C>(client: &Client<C>, meta: &rdkafka::metadata::Metadata) -> Metadata
where
    C: ClientContext,
{
    Metadata {
        cluster_id: client.fetch_cluster_id(CLAIM_TIMEOUT),
        orig_broker_id: meta.orig_broker_id(),
        orig_broker_name: meta.orig_broker_name().to_owned(),
        controller_id: controller_id(client, CLAIM_TIMEOUT),
        brokers: meta
            .brokers()
            .iter()
            .map(|broker| MetadataBroker {
                id: broker.id(),
                host: broker.host().to_owned(),
                port: broker.port(),
            })
            .collect(),
    }
}

/// Controller id claim of the connected broker.
///
/// The safe wrapper does not bind `rd_kafka_controllerid`, so this is the
/// one place the crate reaches through to the C library directly. A
/// negative id means the claim is unknown.
#[allow(unsafe_code)]
fn controller_id<C>(client: &Client<C>, timeout: Duration) -> Option<i32>
where
    C: ClientContext,
{
    let id = unsafe {
        rdkafka_sys::rd_kafka_controllerid(client.native_ptr(), timeout.as_millis() as i32)
    };
    (id >= 0).then_some(id)
}

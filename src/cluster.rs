//! Cluster topology discovery and per-broker configuration enumeration.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{BrokerConfigSource, FetchError, TopologySource};
use crate::metadata::{ConfigEntry, Metadata, MetadataBroker};

/// Broker configuration names relevant to security review.
///
/// Everything else returned by a describe call is dropped before display;
/// the reduction is deliberate, not a fetch artifact.
pub const CONFIG_NAME_ALLOW_LIST: &[&str] = &["ssl.client.auth"];

/// Bounds and display widths for discovery. The defaults mirror the
/// tool's historical behavior; none of them is a protocol requirement.
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    /// Ceiling for each metadata or config fetch.
    pub timeout: Duration,

    /// Display truncation for configuration names.
    pub name_width: usize,

    /// Display truncation for configuration values.
    pub value_width: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            name_width: 40,
            value_width: 20,
        }
    }
}

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("not connected")]
    NotConnected,

    #[error("{0}")]
    Metadata(#[from] FetchError),
}

/// Validation result for a broker id claimed by a metadata snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdClaim {
    /// The claimed id is present in the snapshot's broker set.
    Valid(i32),

    /// The claimed id is absent from the broker set. An inconsistent
    /// snapshot is itself a security-relevant signal, so this is flagged
    /// rather than suppressed.
    Invalid(i32),

    /// The capability did not provide the claim.
    Unavailable,
}

/// Structured result of one discovery run, ready for rendering.
#[derive(Debug)]
pub struct ClusterReport {
    pub cluster_id: Option<String>,
    pub origin_broker_name: String,
    pub origin_broker: IdClaim,
    pub controller: IdClaim,

    /// Broker set sorted by ascending id.
    pub brokers: Vec<MetadataBroker>,

    /// One entry per broker, in broker-id order. Only populated when an
    /// administrative handle was available.
    pub broker_configs: Vec<BrokerConfigReport>,
}

/// Outcome of describing one broker's configuration resource.
#[derive(Debug)]
pub struct BrokerConfigReport {
    pub broker_id: i32,

    /// Allow-list filtered entries sorted by name, or the per-broker
    /// failure. Failures are isolated; sibling brokers still get
    /// described.
    pub entries: Result<Vec<ConfigEntry>, FetchError>,
}

/// Discover the cluster through whichever handles are present.
///
/// The topology fetch prefers the administrative handle (administrative
/// queries may expose more detail); consumer-only sessions cannot query
/// resource configs and skip that phase. Discovery runs to completion for
/// every broker it can reach.
pub async fn describe_cluster<A, C>(
    admin: Option<&A>,
    consumer: Option<&C>,
    policy: FetchPolicy,
) -> Result<ClusterReport, DiscoverError>
where
    A: BrokerConfigSource,
    C: TopologySource,
{
    let meta = match (admin, consumer) {
        (None, None) => return Err(DiscoverError::NotConnected),
        (Some(admin), _) => admin.fetch_topology(policy.timeout).await?,
        (None, Some(consumer)) => consumer.fetch_topology(policy.timeout).await?,
    };
    debug!(brokers = meta.brokers.len(), "metadata snapshot received");

    let mut report = ClusterReport::from_snapshot(meta);

    if let Some(admin) = admin {
        let ids: Vec<i32> = report.brokers.iter().map(|broker| broker.id).collect();
        for broker_id in ids {
            let entries = admin
                .fetch_broker_config(broker_id, policy.timeout)
                .await
                .map(filter_entries);
            if let Err(error) = &entries {
                warn!(broker_id, %error, "broker describe failed");
            }
            report.broker_configs.push(BrokerConfigReport { broker_id, entries });
        }
    }

    Ok(report)
}

impl ClusterReport {
    /// Validate the snapshot's claims and fix the rendering order.
    fn from_snapshot(meta: Metadata) -> Self {
        let mut brokers = meta.brokers;
        brokers.sort_by_key(|broker| broker.id);

        Self {
            origin_broker: validate_claim(Some(meta.orig_broker_id), &brokers),
            controller: validate_claim(meta.controller_id, &brokers),
            cluster_id: meta.cluster_id,
            origin_broker_name: meta.orig_broker_name,
            brokers,
            broker_configs: Vec::new(),
        }
    }
}

/// Cross-check a claimed broker id against the snapshot's broker set.
pub fn validate_claim(claim: Option<i32>, brokers: &[MetadataBroker]) -> IdClaim {
    match claim {
        None => IdClaim::Unavailable,
        Some(id) if brokers.iter().any(|broker| broker.id == id) => IdClaim::Valid(id),
        Some(id) => IdClaim::Invalid(id),
    }
}

/// Reduce a described resource to the allow-listed entries, sorted by
/// configuration name.
pub fn filter_entries(entries: BTreeMap<String, ConfigEntry>) -> Vec<ConfigEntry> {
    entries
        .into_iter()
        .filter(|(name, _)| CONFIG_NAME_ALLOW_LIST.contains(&name.as_str()))
        .map(|(_, entry)| entry)
        .collect()
}

//! Cluster-wide Kafka metadata as reported to the operator.

/// One point-in-time result of a topology query.
///
/// The origin broker is the broker that served this snapshot. Both the
/// origin broker id and the controller id are claims made by that broker
/// and are cross-checked against [`brokers`](Self::brokers) before
/// display.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Cluster identifier, if the cluster reports one.
    pub cluster_id: Option<String>,

    /// The ID of the broker that served this snapshot.
    pub orig_broker_id: i32,

    /// The name of the broker that served this snapshot.
    pub orig_broker_name: String,

    /// The ID of the controller broker, if known.
    pub controller_id: Option<i32>,

    /// Brokers.
    pub brokers: Vec<MetadataBroker>,
}

/// Metadata for a certain broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBroker {
    /// The broker ID, unique within one snapshot.
    pub id: i32,

    /// The broker hostname.
    pub host: String,

    /// The broker port.
    pub port: i32,
}

/// One named configuration setting on a broker resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// The configuration name.
    pub name: String,

    /// The configuration value; sensitive entries may come back absent.
    pub value: Option<String>,

    /// Where the value was set (static file, dynamic override, default).
    pub source: String,

    /// True if the cluster rejects updates to this entry.
    pub is_read_only: bool,

    /// True if the value is security sensitive.
    pub is_sensitive: bool,
}

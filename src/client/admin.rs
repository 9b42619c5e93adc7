//! Administrative connection to the cluster.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use rdkafka::admin::{AdminClient, AdminOptions, ResourceSpecifier};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::KafkaError;
use tracing::debug;

use crate::metadata::{ConfigEntry, Metadata};

use super::{BrokerConfigSource, FetchError, Result, TopologySource, snapshot};

/// Handle for querying cluster and resource configuration.
///
/// Used strictly read-only: no mutating admin operation is ever issued
/// through it.
pub struct AdminHandle {
    inner: Arc<AdminClient<DefaultClientContext>>,
}

impl AdminHandle {
    pub(crate) fn new(client: AdminClient<DefaultClientContext>) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }
}

impl TopologySource for AdminHandle {
    async fn fetch_topology(&self, timeout: Duration) -> Result<Metadata> {
        let client = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || -> Result<Metadata> {
            let meta = client.inner().fetch_metadata(None, timeout)?;
            Ok(snapshot(client.inner(), &meta))
        })
        .await?
    }
}

impl BrokerConfigSource for AdminHandle {
    async fn fetch_broker_config(
        &self,
        broker_id: i32,
        timeout: Duration,
    ) -> Result<BTreeMap<String, ConfigEntry>> {
        debug!(broker_id, "describing broker resource");
        let options = AdminOptions::new().request_timeout(Some(timeout));
        let resource = ResourceSpecifier::Broker(broker_id);

        let mut results = self.inner.describe_configs([&resource], &options).await?;
        let described = results
            .pop()
            .ok_or(FetchError::EmptyResponse)?
            .map_err(|code| FetchError::Client(KafkaError::AdminOp(code)))?;

        Ok(described
            .entries
            .into_iter()
            .map(|entry| {
                let converted = ConfigEntry {
                    name: entry.name.clone(),
                    value: entry.value,
                    source: format!("{:?}", entry.source),
                    is_read_only: entry.is_read_only,
                    is_sensitive: entry.is_sensitive,
                };
                (entry.name, converted)
            })
            .collect())
    }
}

impl std::fmt::Debug for AdminHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminHandle").finish_non_exhaustive()
    }
}

//! Consumer connection to the cluster.

use std::sync::Arc;
use std::time::Duration;

use rdkafka::consumer::{BaseConsumer, Consumer};

use crate::metadata::Metadata;

use super::{Result, TopologySource, snapshot};

/// Handle for reading message streams; the reconnaissance engine only
/// uses it to query topology when no administrative handle is available.
pub struct ConsumerHandle {
    inner: Arc<BaseConsumer>,
}

impl ConsumerHandle {
    pub(crate) fn new(consumer: BaseConsumer) -> Self {
        Self {
            inner: Arc::new(consumer),
        }
    }
}

impl TopologySource for ConsumerHandle {
    async fn fetch_topology(&self, timeout: Duration) -> Result<Metadata> {
        let consumer = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || -> Result<Metadata> {
            let meta = consumer.fetch_metadata(None, timeout)?;
            Ok(snapshot(consumer.client(), &meta))
        })
        .await?
    }
}

impl std::fmt::Debug for ConsumerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerHandle").finish_non_exhaustive()
    }
}

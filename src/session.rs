//! Process-wide session context with an explicit lifecycle.

use crate::client::{AdminHandle, ConsumerHandle};
use crate::config::ConfigStore;
use crate::connect::{ConnectOutcome, HandleError};

/// Broker label shown while no connection is established.
pub const NOT_CONNECTED: &str = "not connected";

/// Everything a command operates on: the configuration, the two optional
/// client handles, and the broker label for the prompt.
///
/// Commands take the session by `&mut`, so connect, disconnect and
/// discovery are serialized by construction. The handle slots are
/// independent: either, both, or neither may be present, and the session
/// can be torn down and reconnected repeatedly without restarting the
/// process.
#[derive(Debug)]
pub struct Session {
    pub config: ConfigStore,
    pub admin: Option<AdminHandle>,
    pub consumer: Option<ConsumerHandle>,
    pub broker: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            config: ConfigStore::new(),
            admin: None,
            consumer: None,
            broker: NOT_CONNECTED.to_owned(),
        }
    }

    /// Install the outcome of a connect attempt.
    ///
    /// Each successfully built handle replaces its slot and updates the
    /// broker label; a failed construction leaves the slot as it was and
    /// is handed back for reporting.
    pub fn apply(&mut self, outcome: ConnectOutcome) -> AppliedConnect {
        let ConnectOutcome {
            bootstrap,
            generated_group_id,
            admin,
            consumer,
        } = outcome;

        let admin_error = match admin {
            Ok(handle) => {
                self.admin = Some(handle);
                self.broker.clone_from(&bootstrap);
                None
            }
            Err(error) => Some(error),
        };
        let consumer_error = match consumer {
            Ok(handle) => {
                self.consumer = Some(handle);
                self.broker.clone_from(&bootstrap);
                None
            }
            Err(error) => Some(error),
        };

        AppliedConnect {
            generated_group_id,
            admin_error,
            consumer_error,
        }
    }

    /// Drop whichever handles are present, closing their connections, and
    /// report which slots were occupied. Both absent is the distinct
    /// "not connected" condition the caller reports as such.
    pub fn disconnect(&mut self) -> Disconnected {
        let disconnected = Disconnected {
            admin: self.admin.take().is_some(),
            consumer: self.consumer.take().is_some(),
        };
        if disconnected.admin || disconnected.consumer {
            self.broker = NOT_CONNECTED.to_owned();
        }
        disconnected
    }

    pub fn is_connected(&self) -> bool {
        self.admin.is_some() || self.consumer.is_some()
    }
}

/// Reportable result of installing a connect outcome.
#[derive(Debug)]
pub struct AppliedConnect {
    pub generated_group_id: Option<String>,
    pub admin_error: Option<HandleError>,
    pub consumer_error: Option<HandleError>,
}

/// Which handle slots a disconnect released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected {
    pub admin: bool,
    pub consumer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use rdkafka::error::KafkaError;
    use serde_json::{Value, json};

    use crate::connect::{self, HandleError};

    fn failed(message: &str) -> HandleError {
        HandleError::from(KafkaError::ClientCreation(message.to_owned()))
    }

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
    fn new_session_is_unconnected() {
        let session = Session::new();
        assert!(!session.is_connected());
        assert_eq!(session.broker, NOT_CONNECTED);
    }

    #[test]
    fn both_failures_leave_the_label_unconnected() {
        let mut session = Session::new();
        let applied = session.apply(ConnectOutcome {
            bootstrap: "k1:9092".to_owned(),
            generated_group_id: None,
            admin: Err(failed("no admin")),
            consumer: Err(failed("no consumer")),
        });

        assert!(applied.admin_error.is_some());
        assert!(applied.consumer_error.is_some());
        assert!(!session.is_connected());
        assert_eq!(session.broker, NOT_CONNECTED);
    }

    #[test]
    fn partial_success_sets_the_label_and_one_slot() {
        let store = store_from(json!({"bootstrap.servers": "localhost:9092"}));
        let outcome = connect::connect(&store).unwrap();

        let mut session = Session::new();
        let applied = session.apply(ConnectOutcome {
            admin: Err(failed("admin rejected")),
            ..outcome
        });

        assert!(applied.admin_error.is_some());
        assert!(applied.consumer_error.is_none());
        assert!(session.admin.is_none());
        assert!(session.consumer.is_some());
        assert_eq!(session.broker, "localhost:9092");
    }

    #[test]
    fn disconnect_reports_released_slots_and_resets_the_label() {
        let store = store_from(json!({"bootstrap.servers": "localhost:9092"}));
        let mut session = Session::new();
        session.apply(connect::connect(&store).unwrap());
        assert!(session.is_connected());

        let disconnected = session.disconnect();
        assert!(disconnected.admin);
        assert!(disconnected.consumer);
        assert!(!session.is_connected());
        assert_eq!(session.broker, NOT_CONNECTED);

        // A second disconnect finds nothing to release.
        let disconnected = session.disconnect();
        assert_eq!(
            disconnected,
            Disconnected {
                admin: false,
                consumer: false
            }
        );
    }
}

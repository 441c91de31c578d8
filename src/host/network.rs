use super::bus::{subscribe, PluginClient, Subscription};
use crate::consts::NETWORK_LOADING;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use std::{fmt, sync::Arc};

pub const BLOCKCHAIN_PLUGIN: &str = "blockchain";
pub const NETWORK_STATUS_EVENT: &str = "networkStatus";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkStatus {
    pub name: String,
    pub id: ChainId,
}

/// Chain id as published by the host. Hosts send either a number or a
/// string, `-` for networks without one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainId::Number(id) => write!(f, "{id}"),
            ChainId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Deserialize)]
struct NetworkStatusEvent {
    network: NetworkStatus,
}

impl NetworkStatus {
    pub fn from_event(payload: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<NetworkStatusEvent>(payload).map(|event| event.network)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(&self.id, ChainId::Text(id) if id == "-")
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_supported() {
            write!(f, "{} (Chain id: {})", self.name, self.id)
        } else {
            write!(f, "{} (Not supported)", self.name)
        }
    }
}

/// Latest network reported by the host, kept up to date for as long as
/// the watcher lives.
pub struct NetworkWatcher {
    display: Arc<RwLock<String>>,
    _subscription: Subscription,
}

impl NetworkWatcher {
    pub fn new(client: Arc<dyn PluginClient>) -> Self {
        let display = Arc::new(RwLock::new(NETWORK_LOADING.to_string()));
        let subscription = {
            let display = display.clone();
            subscribe(client, BLOCKCHAIN_PLUGIN, NETWORK_STATUS_EVENT, move |payload| {
                match NetworkStatus::from_event(payload) {
                    Ok(status) => *display.write() = status.to_string(),
                    Err(err) => tracing::warn!(err = %err, "invalid network status event"),
                }
            })
        };
        Self {
            display,
            _subscription: subscription,
        }
    }

    pub fn network_name(&self) -> String {
        self.display.read().clone()
    }
}

use async_trait::async_trait;
use serde_json::Value;
use std::{fmt, sync::Arc};
use thiserror::Error;

pub type EventHandler = Arc<dyn Fn(Value) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Error, Debug)]
pub enum BusError {
    #[error("plugin '{target}' does not expose method '{method}'")]
    UnknownMethod { target: String, method: String },
    #[error("call to '{target}.{method}' failed: {message}")]
    Call {
        target: String,
        method: String,
        message: String,
    },
    #[error("cannot decode response of '{target}.{method}': {source}")]
    Decode {
        target: String,
        method: String,
        source: serde_json::Error,
    },
}

/// Messaging capability of the hosting IDE.
///
/// Plugins are addressed by name; `call` invokes a method another plugin
/// exposes, `on`/`off` manage listeners of events it publishes.
#[async_trait]
pub trait PluginClient: Send + Sync {
    async fn call(&self, target: &str, method: &str, args: Vec<Value>) -> Result<Value, BusError>;

    fn on(&self, target: &str, event: &str, handler: EventHandler) -> ListenerId;

    fn off(&self, target: &str, event: &str, listener: ListenerId);
}

/// Listener registration that is removed from the host when dropped.
pub struct Subscription {
    client: Arc<dyn PluginClient>,
    target: String,
    event: String,
    listener: ListenerId,
}

impl Subscription {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn event(&self) -> &str {
        &self.event
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("target", &self.target)
            .field("event", &self.event)
            .field("listener", &self.listener)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::debug!(plugin = %self.target, event = %self.event, "removing listener");
        self.client.off(&self.target, &self.event, self.listener);
    }
}

pub fn subscribe<F>(
    client: Arc<dyn PluginClient>,
    target: &str,
    event: &str,
    handler: F,
) -> Subscription
where
    F: Fn(Value) + Send + Sync + 'static,
{
    let listener = client.on(target, event, Arc::new(handler));
    Subscription {
        client,
        target: target.to_string(),
        event: event.to_string(),
        listener,
    }
}

/// Calls `target.method` and deserializes the response.
pub async fn call_typed<T>(
    client: &dyn PluginClient,
    target: &str,
    method: &str,
    args: Vec<Value>,
) -> Result<T, BusError>
where
    T: serde::de::DeserializeOwned,
{
    let value = client.call(target, method, args).await?;
    serde_json::from_value(value).map_err(|source| BusError::Decode {
        target: target.to_string(),
        method: method.to_string(),
        source,
    })
}

use super::bus::{BusError, EventHandler, ListenerId, PluginClient};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// Number of most recent calls `LocalHost::calls` remembers.
pub const CALL_LOG_LIMIT: usize = 64;

type MethodHandler = Arc<dyn Fn(Vec<Value>) -> Result<Value, String> + Send + Sync>;
type Key = (String, String);

fn key(target: &str, name: &str) -> Key {
    (target.to_string(), name.to_string())
}

/// In-process host: plugins register methods on it and publish events
/// through it.
#[derive(Default)]
pub struct LocalHost {
    methods: RwLock<HashMap<Key, MethodHandler>>,
    listeners: Mutex<HashMap<Key, Vec<(ListenerId, EventHandler)>>>,
    next_listener: AtomicU64,
    calls: Mutex<VecDeque<Key>>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, target: &str, method: &str, handler: F)
    where
        F: Fn(Vec<Value>) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.methods
            .write()
            .insert(key(target, method), Arc::new(handler));
    }

    /// Registers a method that always answers with `value`.
    pub fn register_value(&self, target: &str, method: &str, value: Value) {
        self.register(target, method, move |_| Ok(value.clone()));
    }

    /// Delivers `payload` to every listener of `target.event`.
    /// Returns the number of listeners notified.
    pub fn emit(&self, target: &str, event: &str, payload: Value) -> usize {
        // handlers are cloned out so that they may (un)subscribe themselves
        let handlers: Vec<_> = {
            let listeners = self.listeners.lock();
            listeners
                .get(&key(target, event))
                .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default()
        };
        for handler in &handlers {
            handler(payload.clone());
        }
        handlers.len()
    }

    pub fn listener_count(&self, target: &str, event: &str) -> usize {
        self.listeners
            .lock()
            .get(&key(target, event))
            .map(Vec::len)
            .unwrap_or_default()
    }

    /// `(target, method)` of the last `CALL_LOG_LIMIT` calls, oldest first.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().iter().cloned().collect()
    }

    fn record_call(&self, target: &str, method: &str) {
        let mut calls = self.calls.lock();
        if calls.len() == CALL_LOG_LIMIT {
            calls.pop_front();
        }
        calls.push_back(key(target, method));
    }
}

#[async_trait]
impl PluginClient for LocalHost {
    async fn call(&self, target: &str, method: &str, args: Vec<Value>) -> Result<Value, BusError> {
        self.record_call(target, method);
        let handler = self
            .methods
            .read()
            .get(&key(target, method))
            .cloned()
            .ok_or_else(|| BusError::UnknownMethod {
                target: target.to_string(),
                method: method.to_string(),
            })?;
        handler(args).map_err(|message| BusError::Call {
            target: target.to_string(),
            method: method.to_string(),
            message,
        })
    }

    fn on(&self, target: &str, event: &str, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .entry(key(target, event))
            .or_default()
            .push((id, handler));
        id
    }

    fn off(&self, target: &str, event: &str, listener: ListenerId) {
        let mut listeners = self.listeners.lock();
        if let Some(handlers) = listeners.get_mut(&key(target, event)) {
            handlers.retain(|(id, _)| *id != listener);
            if handlers.is_empty() {
                listeners.remove(&key(target, event));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::bus::subscribe;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn calls_registered_methods() {
        let host = LocalHost::new();
        host.register("solidity", "echo", |args| Ok(Value::Array(args)));

        let value = host
            .call("solidity", "echo", vec![json!(1), json!("two")])
            .await
            .expect("method is registered");
        assert_eq!(json!([1, "two"]), value);
        assert_eq!(
            vec![("solidity".to_string(), "echo".to_string())],
            host.calls()
        );
    }

    #[tokio::test]
    async fn call_log_keeps_most_recent_calls() {
        let host = LocalHost::new();
        host.register_value("solidity", "echo", Value::Null);

        for _ in 0..CALL_LOG_LIMIT {
            host.call("solidity", "echo", vec![]).await.unwrap();
        }
        host.call("solidity", "missing", vec![]).await.unwrap_err();

        let calls = host.calls();
        assert_eq!(CALL_LOG_LIMIT, calls.len());
        assert_eq!(
            Some(&("solidity".to_string(), "missing".to_string())),
            calls.last()
        );
    }

    #[tokio::test]
    async fn unknown_method_and_failed_call() {
        let host = LocalHost::new();
        host.register("solidity", "fail", |_| Err("compiler crashed".into()));

        let err = host.call("solidity", "missing", vec![]).await.unwrap_err();
        assert!(matches!(err, BusError::UnknownMethod { .. }), "got {err:?}");

        let err = host.call("solidity", "fail", vec![]).await.unwrap_err();
        assert_eq!(
            "call to 'solidity.fail' failed: compiler crashed",
            err.to_string()
        );
    }

    #[test]
    fn subscription_is_removed_on_drop() {
        let host = Arc::new(LocalHost::new());
        let received = Arc::new(Mutex::new(Vec::new()));

        let subscription = {
            let received = received.clone();
            subscribe(host.clone(), "blockchain", "networkStatus", move |value| {
                received.lock().push(value)
            })
        };
        assert_eq!(1, host.listener_count("blockchain", "networkStatus"));
        assert_eq!(1, host.emit("blockchain", "networkStatus", json!("first")));

        drop(subscription);
        assert_eq!(0, host.listener_count("blockchain", "networkStatus"));
        assert_eq!(0, host.emit("blockchain", "networkStatus", json!("second")));

        assert_eq!(vec![json!("first")], *received.lock());
    }
}

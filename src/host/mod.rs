mod bus;
mod compiler;
mod local;
mod network;

pub use bus::{
    call_typed, subscribe, BusError, EventHandler, ListenerId, PluginClient, Subscription,
};
pub use compiler::{CompilerApi, ContractArtefact, ARTEFACTS_PLUGIN, SOLIDITY_PLUGIN};
pub use local::LocalHost;
pub use network::{ChainId, NetworkStatus, NetworkWatcher, BLOCKCHAIN_PLUGIN, NETWORK_STATUS_EVENT};

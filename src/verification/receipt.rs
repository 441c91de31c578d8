use chrono::{DateTime, Utc};
use ethers_core::types::Address;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Record of a request the explorer accepted, kept so that its status
/// can be looked up later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub guid: String,
    pub status: String,
    pub contract_name: String,
    pub contract_address: Address,
    pub is_proxy_contract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub trait ReceiptSink: Send + Sync {
    fn on_verified(&self, receipt: Receipt);
}

impl<F> ReceiptSink for F
where
    F: Fn(Receipt) + Send + Sync,
{
    fn on_verified(&self, receipt: Receipt) {
        self(receipt)
    }
}

/// Keeps every receipt in memory, in arrival order.
#[derive(Debug, Default)]
pub struct ReceiptLog {
    receipts: Mutex<Vec<Receipt>>,
}

impl ReceiptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receipts(&self) -> Vec<Receipt> {
        self.receipts.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.receipts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReceiptSink for ReceiptLog {
    fn on_verified(&self, receipt: Receipt) {
        self.receipts.lock().push(receipt);
    }
}

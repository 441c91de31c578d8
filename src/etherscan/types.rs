use super::Error;
use crate::consts::PENDING_IN_QUEUE;
use serde::Deserialize;
use std::fmt;

/// Envelope every Etherscan api call answers with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EtherscanResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub result: String,
}

impl EtherscanResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1" && self.message.starts_with("OK")
    }

    /// The `result` of a successful call, or the `result` text as the error.
    pub fn into_result(self) -> Result<String, Error> {
        if self.is_ok() {
            Ok(self.result)
        } else {
            Err(Error::Etherscan(self.result))
        }
    }

    pub fn into_receipt_status(self) -> ReceiptStatus {
        if self.result == PENDING_IN_QUEUE {
            ReceiptStatus::Pending
        } else if self.is_ok() {
            ReceiptStatus::Completed(self.result)
        } else {
            ReceiptStatus::Failed(self.result)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptStatus {
    Pending,
    Completed(String),
    Failed(String),
}

impl ReceiptStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReceiptStatus::Pending)
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptStatus::Pending => f.write_str(PENDING_IN_QUEUE),
            ReceiptStatus::Completed(result) | ReceiptStatus::Failed(result) => {
                f.write_str(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::parse::test_deserialize_ok;
    use pretty_assertions::assert_eq;

    fn response(status: &str, message: &str, result: &str) -> EtherscanResponse {
        EtherscanResponse {
            status: status.into(),
            message: message.into(),
            result: result.into(),
        }
    }

    #[test]
    fn deserialize_response() {
        test_deserialize_ok(vec![
            (
                r#"{"status":"1","message":"OK","result":"ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn"}"#,
                response(
                    "1",
                    "OK",
                    "ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn",
                ),
            ),
            (
                r#"{"status":"0","message":"NOTOK"}"#,
                response("0", "NOTOK", ""),
            ),
        ]);
    }

    #[test]
    fn results() {
        assert_eq!(
            "guid",
            response("1", "OK", "guid").into_result().unwrap()
        );
        let err = response("0", "NOTOK", "Invalid API Key")
            .into_result()
            .unwrap_err();
        assert_eq!("Invalid API Key", err.to_string());
    }

    #[test]
    fn receipt_statuses() {
        assert_eq!(
            ReceiptStatus::Pending,
            response("0", "NOTOK", "Pending in queue").into_receipt_status()
        );
        assert_eq!(
            ReceiptStatus::Completed("Pass - Verified".into()),
            response("1", "OK", "Pass - Verified").into_receipt_status()
        );
        let failed = response("0", "NOTOK", "Fail - Unable to verify").into_receipt_status();
        assert_eq!("Fail - Unable to verify", failed.to_string());
        assert!(!failed.is_pending());
    }
}

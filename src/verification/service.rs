use crate::compilation::CompilationResult;
use async_trait::async_trait;
use ethers_core::types::Address;
use thiserror::Error;

/// Everything an explorer needs to recompile and match a contract.
#[derive(Debug, Clone, Copy)]
pub struct SourceSubmission<'a> {
    pub contract_name: &'a str,
    pub contract_address: Address,
    /// Hex encoded, without `0x`.
    pub constructor_arguments: &'a str,
    pub compilation: &'a CompilationResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub guid: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResolution {
    pub guid: String,
    pub status: String,
    /// Implementation the explorer resolved for the proxy, if it reported one.
    pub implementation: Option<Address>,
}

/// Error reported by the verification service, surfaced as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait VerificationService: Send + Sync {
    async fn verify_source(
        &self,
        submission: SourceSubmission<'_>,
    ) -> Result<SubmissionTicket, ServiceError>;

    async fn verify_proxy(
        &self,
        proxy: Address,
        expected_implementation: Option<Address>,
    ) -> Result<ProxyResolution, ServiceError>;
}

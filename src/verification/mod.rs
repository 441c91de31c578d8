mod flow;
mod receipt;
mod request;
mod service;

pub use flow::{VerificationFlow, VerificationSuccess};
pub use receipt::{Receipt, ReceiptLog, ReceiptSink};
pub use request::{parse_address, Field, FieldError, FieldErrors, FormValues, VerificationRequest};
pub use service::{
    ProxyResolution, ServiceError, SourceSubmission, SubmissionTicket, VerificationService,
};

use crate::{
    compilation::CompilationError, constructor_args::ConstructorArgsError, host::BusError,
    types::ImplementationMismatch,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("no compilation result available")]
    NoCompilationResult,
    #[error("contract {0} is not among the compiled contracts")]
    UnknownContract(String),
    #[error("{0}")]
    Compilation(#[from] CompilationError),
    #[error("{0}")]
    ConstructorArguments(#[from] ConstructorArgsError),
    #[error("{0}")]
    Host(#[from] BusError),
    #[error("{0}")]
    Service(String),
    #[error("proxy implementation address mismatch: {0}")]
    ProxyImplementationMismatch(ImplementationMismatch),
}

impl VerificationError {
    pub fn is_validation_error(&self) -> bool {
        matches!(self, VerificationError::Validation(_))
    }

    pub fn is_invalid_address_format(&self) -> bool {
        match self {
            VerificationError::Validation(errors) => errors
                .iter()
                .any(|(_, error)| error == FieldError::InvalidAddressFormat),
            _ => false,
        }
    }

    pub fn is_argument_count_mismatch(&self) -> bool {
        matches!(
            self,
            VerificationError::ConstructorArguments(ConstructorArgsError::CountMismatch(_))
        )
    }

    pub fn is_proxy_mismatch(&self) -> bool {
        matches!(self, VerificationError::ProxyImplementationMismatch(_))
    }
}

/// Outcome of one submission, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub succeeded: bool,
    pub message: String,
}

impl VerificationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
        }
    }
}

impl From<&Result<VerificationSuccess, VerificationError>> for VerificationResult {
    fn from(outcome: &Result<VerificationSuccess, VerificationError>) -> Self {
        match outcome {
            Ok(success) => Self::success(success.message.clone()),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

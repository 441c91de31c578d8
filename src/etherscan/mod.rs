mod client;
mod types;

pub use client::{last_address, Client};
pub use types::{EtherscanResponse, ReceiptStatus};

use crate::compilation::CompilationError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {arg} - {error}")]
    InvalidArgument { arg: String, error: String },
    #[error("error occurred while sending request: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("{0}")]
    Etherscan(String),
    #[error("unexpected status code: {status_code} - {msg}")]
    UnexpectedStatusCode {
        status_code: reqwest::StatusCode,
        msg: String,
    },
    #[error("{0}")]
    Compilation(#[from] CompilationError),
}

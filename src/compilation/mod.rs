mod metadata;
mod result;

pub use metadata::{ContractMetadata, MetadataCompiler, MetadataSettings};
pub use result::{
    CompilationResult, CompilationSource, CompiledContract, CompilerOutput, ContractRef,
    OptimizerSettings, SourceFile, StandardJsonInput, StandardJsonSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompilationError {
    #[error("contract {0} is not part of the compilation result")]
    ContractNotFound(String),
    #[error("metadata of contract {0} is missing, please recompile the contract")]
    MissingMetadata(String),
    #[error("invalid metadata of contract {contract}: {source}")]
    InvalidMetadata {
        contract: String,
        source: serde_json::Error,
    },
    #[error("invalid abi of contract {contract}: {source}")]
    InvalidAbi {
        contract: String,
        source: serde_json::Error,
    },
}

mod compilation;
mod constructor_args;
mod consts;
mod etherscan;
mod host;
mod logs;
mod settings;
mod types;
mod verification;
mod view;


pub use self::settings::{EtherscanSettings, Settings, TracingFormat, TracingSettings};
pub use compilation::{
    CompilationError, CompilationResult, CompilationSource, CompiledContract, CompilerOutput,
    ContractMetadata, ContractRef, MetadataCompiler, MetadataSettings, OptimizerSettings,
    SourceFile, StandardJsonInput, StandardJsonSettings,
};
pub use constructor_args::{
    constructor_params, decode_constructor_args, encode_constructor_args, ConstructorArgsError,
    ConstructorArgument, ConstructorInput,
};
pub use consts::{KNOWN_ETHERSCAN_API_URLS, NETWORK_LOADING, UNSUPPORTED_NETWORK};
pub use etherscan::{
    last_address, Client as EtherscanClient, Error as EtherscanError, EtherscanResponse,
    ReceiptStatus,
};
pub use ethers_core::types::Address;
pub use host::{
    call_typed, subscribe, BusError, ChainId, CompilerApi, ContractArtefact, EventHandler,
    ListenerId, LocalHost, NetworkStatus, NetworkWatcher, PluginClient, Subscription,
    ARTEFACTS_PLUGIN, BLOCKCHAIN_PLUGIN, NETWORK_STATUS_EVENT, SOLIDITY_PLUGIN,
};
pub use logs::init_logs;
pub use types::{ArgumentCountMismatch, ImplementationMismatch};
pub use verification::{
    parse_address, Field, FieldError, FieldErrors, FormValues, ProxyResolution, Receipt,
    ReceiptLog, ReceiptSink, ServiceError, SourceSubmission, SubmissionTicket,
    VerificationError, VerificationFlow, VerificationRequest, VerificationResult,
    VerificationService, VerificationSuccess,
};
pub use view::{FormState, VerifyView};

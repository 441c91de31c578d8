pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/api";

/// Block-explorer API endpoints for the chains verification is offered on
/// out of the box. Anything else has to be configured explicitly.
pub const KNOWN_ETHERSCAN_API_URLS: [(u64, &str); 4] = [
    (1, DEFAULT_ETHERSCAN_API_URL),
    (5, "https://api-goerli.etherscan.io/api"),
    (17000, "https://api-holesky.etherscan.io/api"),
    (11155111, "https://api-sepolia.etherscan.io/api"),
];

pub const SOLIDITY_STANDARD_JSON_INPUT: &str = "solidity-standard-json-input";

/// Etherscan keeps a proxy verification in this state until the
/// implementation lookup has run.
pub const PENDING_IN_QUEUE: &str = "Pending in queue";

pub const REQUIRED_FIELD: &str = "Required";
pub const INVALID_CONTRACT_ADDRESS: &str = "Please enter a valid contract address";

pub const NETWORK_LOADING: &str = "Loading...";
pub const UNSUPPORTED_NETWORK: &str = "VM (Not supported)";

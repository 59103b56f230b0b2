//! Constants used in the deploy scripts

/// The token contract key in the `deployments.json` file
pub const TOKEN_CONTRACT_KEY: &str = "token_contract";

/// The Moloch contract key in the `deployments.json` file
pub const MOLOCH_CONTRACT_KEY: &str = "moloch_contract";

/// The constructor summary used for artifacts whose ABI declares no constructor
pub const NO_CONSTRUCTOR_ARGS_SUMMARY: &str = "no constructor arguments";

/// The default path to the `deployments.json` file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default path to the token contract's Hardhat compilation artifact
pub const DEFAULT_TOKEN_ARTIFACT_PATH: &str = "artifacts/contracts/Token.sol/Token.json";

/// The default path to the Moloch contract's Hardhat compilation artifact
pub const DEFAULT_MOLOCH_ARTIFACT_PATH: &str = "artifacts/contracts/Moloch.sol/Moloch.json";

/// The RPC URL of a local development node
pub const DEVELOP_RPC_URL: &str = "http://localhost:8545";

/// The RPC URL of the BSC testnet
pub const TESTNET_RPC_URL: &str = "https://data-seed-prebsc-1-s1.binance.org:8545";

/// The RPC URL of BSC mainnet
pub const MAINNET_RPC_URL: &str = "https://bsc-dataseed.binance.org/";

/// The gas price used on the BSC networks, in wei (20 gwei)
pub const BSC_GAS_PRICE: u64 = 20_000_000_000;

/// The address of the token contract already deployed to the BSC testnet
pub const TESTNET_TOKEN_ADDRESS: &str = "0x38d28227815af0281de9184919C09193898296b5";

/// The address of the Moloch contract already deployed to the BSC testnet
pub const TESTNET_MOLOCH_ADDRESS: &str = "0xD485ce0E2c7132211Ac66EEad4309f0a7eA8a436";

/// The interval at which to poll for a deployment transaction's receipt,
/// in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;

/// The bounded window to wait for a deployment transaction's confirmation,
/// in seconds
pub const CONFIRMATION_TIMEOUT_SECS: u64 = 300;

/// The default total supply minted to the token's deployer (10^26 base units)
pub const DEFAULT_TOKEN_SUPPLY: &str = "100000000000000000000000000";

/// The default Moloch period duration, in seconds
pub const DEFAULT_PERIOD_DURATION: u64 = 300;

/// The default Moloch voting period length, in periods
pub const DEFAULT_VOTING_PERIOD_LENGTH: u64 = 1;

/// The default Moloch grace period length, in periods
pub const DEFAULT_GRACE_PERIOD_LENGTH: u64 = 1;

/// The default Moloch proposal abort window, in periods
pub const DEFAULT_ABORT_WINDOW: u64 = 1;

/// The default Moloch dilution bound, the maximum multiplier a YES voter
/// is obligated to pay in case of mass ragequit
pub const DEFAULT_DILUTION_BOUND: u64 = 3;

#![allow(missing_docs)]
//! Error types exposed by this package.

use std::{fmt::Display, time::Duration};

use crate::AddressHrp;

/// Errors that can occur while working with [crate::Address] values and prefixes.
#[derive(thiserror::Error, Debug)]
pub enum AddressError {
    #[error("Invalid address prefix: expected {hrp}1... got {address}")]
    InvalidAddressPrefix { address: String, hrp: AddressHrp },
    #[error("Invalid bech32 encoding in {address:?}: {source}")]
    InvalidBech32 {
        address: String,
        source: bech32::DecodeError,
    },
    #[error("Invalid byte count within {address:?}, expected 20 or 32 bytes, received {actual}")]
    InvalidByteCount { address: String, actual: usize },
    #[error("Invalid HRP provided: {hrp:?}")]
    InvalidHrp { hrp: String },
}

/// Errors from converting between base and display units.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DenomError {
    #[error("Invalid amount format {input:?}, expected a non-negative decimal number")]
    InvalidAmountFormat { input: String },
}

/// Error while parsing a [crate::ParsedCoin].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not parse coin value {input:?}: {reason}")]
pub struct ParseCoinError {
    pub input: String,
    pub reason: &'static str,
}

/// Errors that can occur while working with [crate::gas_price::GasPrice].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GasPriceError {
    #[error("Invalid gas price {input:?}: {reason}. Expected an amount followed by a denom, e.g. 0.025ngonka")]
    InvalidFormat { input: String, reason: &'static str },
    #[error("Overflow while computing the fee for {gas_limit} gas at {gas_price}")]
    FeeOverflow { gas_limit: u64, gas_price: String },
}

/// Errors that can occur while building a connection.
#[derive(thiserror::Error, Debug)]
pub enum BuilderError {
    #[error("Unable to build HTTP client for {api_url}: {source}")]
    HttpClient {
        api_url: String,
        source: reqwest::Error,
    },
}

/// Parse errors while interacting with chain data.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ChainParseError {
    #[error("Could not parse timestamp {timestamp:?} from transaction {txhash}: {source:?}")]
    InvalidTimestamp {
        timestamp: String,
        txhash: String,
        source: chrono::ParseError,
    },
    #[error("Invalid {field} value {value:?} in transaction {txhash}: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        txhash: String,
        source: std::num::ParseIntError,
    },
    #[error("Invalid tx_response in transaction {txhash}: {message}")]
    InvalidTxResponse { txhash: String, message: String },
}

/// Failure reported by a [crate::ChainClient] implementation.
///
/// The wrapped error is surfaced as-is: its message and source chain are not
/// altered by this library.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct ChainClientError(Box<dyn std::error::Error + Send + Sync>);

impl ChainClientError {
    /// Wrap an error coming from the underlying chain client.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ChainClientError(source.into())
    }

    /// Attempt to view the underlying error as a concrete type.
    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Unwrap the underlying error.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.0
    }
}

/// Errors that occur while querying the REST endpoint.
#[derive(thiserror::Error, Debug)]
#[error("On connection to {url}, while performing: {action}. {details}")]
pub struct QueryError {
    pub action: Action,
    pub url: String,
    pub details: QueryErrorDetails,
}

/// The lower-level details of how a query failed.
#[derive(thiserror::Error, Debug)]
pub enum QueryErrorDetails {
    #[error("Network error: {source}")]
    Network { source: reqwest::Error },
    #[error("Unable to read response body (HTTP status {status}): {source}")]
    Body {
        status: reqwest::StatusCode,
        source: reqwest::Error,
    },
    #[error("Invalid JSON returned (HTTP status {status}): {source}")]
    Json {
        status: reqwest::StatusCode,
        source: serde_json::Error,
    },
}

/// General errors while interacting with the chain
///
/// This is the error type returned by the transaction lifecycle. The other
/// error types represent "preparation" errors and are wrapped here when they
/// occur during a call.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Signer is unknown. Provide a signer capability before submitting transactions.")]
    UnknownSigner,
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Denom(#[from] DenomError),
    #[error(transparent)]
    GasPrice(#[from] GasPriceError),
    #[error(transparent)]
    ChainClient(#[from] ChainClientError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Error parsing data returned from chain: {source}. While performing: {action}")]
    ChainParse {
        source: Box<ChainParseError>,
        action: Action,
    },
    #[error("Transaction with ID {txhash} was submitted but was not yet found on the chain. You might want to check later. There was a wait of {} seconds.", timeout.as_secs())]
    WaitForTransactionTimedOut { txhash: String, timeout: Duration },
}

impl Error {
    /// The transaction hash to look up again later, if this error is a timeout.
    pub fn timed_out_txhash(&self) -> Option<&str> {
        match self {
            Error::WaitForTransactionTimedOut { txhash, .. } => Some(txhash),
            _ => None,
        }
    }
}

/// The action being performed when an error occurred.
#[derive(Debug, Clone)]
pub enum Action {
    GetTransaction(String),
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::GetTransaction(txhash) => write!(f, "get transaction {txhash}"),
        }
    }
}

/// Different known Cosmos SDK error codes
///
/// Found transactions with a non-zero code carry one of these. We can expand
/// this over time, just including the most common ones for now
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CosmosSdkError {
    /// Code 4
    Unauthorized,
    /// Code 5
    InsufficientFunds,
    /// Code 11
    OutOfGas,
    /// Code 13
    InsufficientFee,
    /// Code 19
    TxInMempool,
    /// Code 21
    TxTooLarge,
    /// Code 28
    InvalidChainId,
    /// Code 30
    TxTimeoutHeight,
    /// Code 32
    IncorrectAccountSequence,
    /// Some other error code
    Other(u32),
}

impl Display for CosmosSdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CosmosSdkError::Unauthorized => f.write_str("unauthorized (4)"),
            CosmosSdkError::InsufficientFunds => f.write_str("insufficient funds (5)"),
            CosmosSdkError::OutOfGas => f.write_str("out of gas (11)"),
            CosmosSdkError::InsufficientFee => f.write_str("insufficient fee (13)"),
            CosmosSdkError::TxInMempool => f.write_str("tx already in mempool (19)"),
            CosmosSdkError::TxTooLarge => f.write_str("tx too large (21)"),
            CosmosSdkError::InvalidChainId => f.write_str("invalid chain ID (28)"),
            CosmosSdkError::TxTimeoutHeight => f.write_str("tx timeout height (30)"),
            CosmosSdkError::IncorrectAccountSequence => {
                f.write_str("incorrect account sequence (32)")
            }
            CosmosSdkError::Other(code) => write!(f, "Cosmos SDK error {code}"),
        }
    }
}

impl From<u32> for CosmosSdkError {
    fn from(value: u32) -> Self {
        match value {
            4 => Self::Unauthorized,
            5 => Self::InsufficientFunds,
            11 => Self::OutOfGas,
            13 => Self::InsufficientFee,
            19 => Self::TxInMempool,
            21 => Self::TxTooLarge,
            28 => Self::InvalidChainId,
            30 => Self::TxTimeoutHeight,
            32 => Self::IncorrectAccountSequence,
            _ => Self::Other(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_carries_txhash() {
        let err = Error::WaitForTransactionTimedOut {
            txhash: "ABCDEF".to_owned(),
            timeout: Duration::from_secs(60),
        };
        assert_eq!(err.timed_out_txhash(), Some("ABCDEF"));
        let message = err.to_string();
        assert!(message.contains("ABCDEF"), "{message}");
        assert!(message.contains("60 seconds"), "{message}");
        assert_eq!(Error::UnknownSigner.timed_out_txhash(), None);
    }

    #[test]
    fn chain_client_error_is_transparent() {
        #[derive(thiserror::Error, Debug)]
        #[error("insufficient funds for fees")]
        struct Rejected;

        let err: Error = ChainClientError::new(Rejected).into();
        assert_eq!(err.to_string(), "insufficient funds for fees");
        match err {
            Error::ChainClient(inner) => assert!(inner.downcast_ref::<Rejected>().is_some()),
            _ => panic!("Unexpected error variant"),
        }
    }

    #[test]
    fn sdk_error_codes() {
        assert_eq!(CosmosSdkError::from(5), CosmosSdkError::InsufficientFunds);
        assert_eq!(CosmosSdkError::from(11), CosmosSdkError::OutOfGas);
        assert_eq!(CosmosSdkError::from(1234), CosmosSdkError::Other(1234));
        assert_eq!(CosmosSdkError::OutOfGas.to_string(), "out of gas (11)");
    }
}

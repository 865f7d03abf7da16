#![deny(missing_docs)]
//! Client SDK for submitting and observing transactions on the Gonka chain
pub use address::{assert_prefix, Address, AddressHrp, RawAddress, GONKA_HRP};
pub use broadcast::{wait_for_transaction, PollSettings, TxBroadcaster};
pub use client::{ChainClient, Signer};
pub use cosmos_sdk_proto as proto;
pub use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
pub use cosmos_sdk_proto::cosmos::gov::v1::VoteOption;
pub use denom::{from_ngonka, to_base_units, to_display_units, to_ngonka, NGONKA_DECIMALS};
pub use error::{AddressError, DenomError, Error};
pub use gas::{FeeDecision, GasEstimator};
pub use gas_multiplier::{GasMultipliers, OperationKind};
pub use gonka_builder::GonkaBuilder;
pub use parsed_coin::ParsedCoin;
pub use query::{RestClient, TxStatusQuery};
pub use receipt::{TxEvent, TxEventAttribute, TxReceipt};
pub use txbuilder::{TxBuilder, TxMessage, TxOptions};

mod address;
mod broadcast;
mod client;
mod gas;
mod gas_multiplier;
mod gonka_builder;
mod messages;
mod parsed_coin;
mod query;
mod receipt;
mod txbuilder;

#[cfg(feature = "clap")]
pub mod clap;

#[cfg(feature = "config")]
pub mod config;

pub mod denom;
pub mod error;
pub mod gas_price;

/// A result type with our error type provided as the default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

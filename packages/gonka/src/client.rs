//! Capabilities supplied by the signing chain client.
//!
//! Key management, signing and the gRPC/Tendermint wire protocols live behind
//! these traits. [crate::TxBroadcaster] only orchestrates calls to them.

use std::sync::Arc;

use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::tx::v1beta1::Fee;

use crate::{error::ChainClientError, TxMessage};

/// An account able to sign transactions.
pub trait Signer: Send + Sync {
    /// The bech32 address this signer signs for.
    fn get_address_string(&self) -> String;
}

impl<T: Signer + ?Sized> Signer for &T {
    fn get_address_string(&self) -> String {
        (**self).get_address_string()
    }
}

impl<T: Signer + ?Sized> Signer for Arc<T> {
    fn get_address_string(&self) -> String {
        (**self).get_address_string()
    }
}

/// A client able to simulate, sign and submit transactions.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Dry-run the messages and return the gas they consume.
    ///
    /// Must not change chain state.
    async fn simulate(
        &self,
        signer_address: &str,
        messages: &[Arc<TxMessage>],
        memo: &str,
    ) -> Result<u64, ChainClientError>;

    /// Sign and submit the messages in sync mode.
    ///
    /// Returns the transaction hash as soon as the node accepts the
    /// transaction into its mempool. This does not imply block inclusion.
    async fn sign_and_broadcast_sync(
        &self,
        signer: &dyn Signer,
        messages: &[Arc<TxMessage>],
        fee: &Fee,
        memo: &str,
    ) -> Result<String, ChainClientError>;
}

#[async_trait]
impl<T: ChainClient + ?Sized> ChainClient for Arc<T> {
    async fn simulate(
        &self,
        signer_address: &str,
        messages: &[Arc<TxMessage>],
        memo: &str,
    ) -> Result<u64, ChainClientError> {
        (**self).simulate(signer_address, messages, memo).await
    }

    async fn sign_and_broadcast_sync(
        &self,
        signer: &dyn Signer,
        messages: &[Arc<TxMessage>],
        fee: &Fee,
        memo: &str,
    ) -> Result<String, ChainClientError> {
        (**self)
            .sign_and_broadcast_sync(signer, messages, fee, memo)
            .await
    }
}

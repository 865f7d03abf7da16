//! Transaction submission and confirmation polling.

use std::{sync::Arc, time::Duration};

use cosmos_sdk_proto::cosmos::{
    bank::v1beta1::MsgSend,
    gov::v1::{MsgVote, VoteOption},
};
use tokio::time::Instant;

use crate::{
    gas::{FeeDecision, GasEstimator},
    gas_multiplier::OperationKind,
    query::RestClient,
    txbuilder::TxOptions,
    ChainClient, Error, GonkaBuilder, ParsedCoin, Result, Signer, TxBuilder, TxReceipt,
    TxStatusQuery,
};

/// How often and for how long to look for a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    /// Wait before each status query
    pub interval: Duration,
    /// Give up once this much time has passed since polling started
    pub timeout: Duration,
}

impl PollSettings {
    /// Poll settings from the builder.
    pub fn from_builder(builder: &GonkaBuilder) -> Self {
        PollSettings {
            interval: builder.get_poll_interval(),
            timeout: builder.get_poll_timeout(),
        }
    }
}

/// Poll `query` until the transaction is found or `poll.timeout` elapses.
///
/// Each attempt first waits `poll.interval`, so the first query happens one
/// interval after this is called. A found transaction is returned even if it
/// failed on chain. The timeout error fires no earlier than the deadline and
/// no later than one interval after it.
pub async fn wait_for_transaction<Q: TxStatusQuery + ?Sized>(
    query: &Q,
    txhash: impl Into<String>,
    poll: PollSettings,
) -> Result<TxReceipt> {
    let txhash = txhash.into();
    let PollSettings { interval, timeout } = poll;
    let deadline = Instant::now() + timeout;
    let mut attempt = 0u32;

    while Instant::now() < deadline {
        tokio::time::sleep(interval).await;
        attempt += 1;
        match query.get_transaction(&txhash).await? {
            Some(receipt) => {
                tracing::info!(
                    "Transaction {txhash} found at height {} with code {}",
                    receipt.height,
                    receipt.code
                );
                return Ok(receipt);
            }
            None => tracing::debug!("Transaction {txhash} not ready, attempt #{attempt}"),
        }
    }

    tracing::warn!(
        "Transaction {txhash} not found after {attempt} attempts over {}s",
        timeout.as_secs()
    );
    Err(Error::WaitForTransactionTimedOut { txhash, timeout })
}

/// Submits transactions and waits for them to land on chain.
///
/// Each call is independent: the only shared state is the immutable
/// [GonkaBuilder], so a broadcaster can be used from many tasks at once.
pub struct TxBroadcaster<C, Q = RestClient> {
    builder: Arc<GonkaBuilder>,
    client: C,
    query: Q,
    estimator: GasEstimator,
}

impl<C: ChainClient> TxBroadcaster<C, RestClient> {
    /// Broadcast through `client`, looking up transactions over REST.
    pub fn with_rest(
        builder: impl Into<Arc<GonkaBuilder>>,
        client: C,
    ) -> std::result::Result<Self, crate::error::BuilderError> {
        let builder = builder.into();
        let query = RestClient::new(&builder)?;
        Ok(Self::new(builder, client, query))
    }
}

impl<C: ChainClient, Q: TxStatusQuery> TxBroadcaster<C, Q> {
    /// Create a broadcaster from its collaborators.
    pub fn new(builder: impl Into<Arc<GonkaBuilder>>, client: C, query: Q) -> Self {
        let builder = builder.into();
        TxBroadcaster {
            estimator: GasEstimator::from_builder(&builder),
            builder,
            client,
            query,
        }
    }

    /// The connection settings in use.
    pub fn get_builder(&self) -> &Arc<GonkaBuilder> {
        &self.builder
    }

    /// The status query capability.
    pub fn get_query(&self) -> &Q {
        &self.query
    }

    /// Send `amount` base units of the configured denom to `to`.
    pub async fn send(
        &self,
        signer: Option<&dyn Signer>,
        to: &str,
        amount: &str,
        options: TxOptions,
    ) -> Result<TxReceipt> {
        self.builder.hrp().assert_prefix(to)?;
        let coin = ParsedCoin::new(amount, self.builder.denom())?;
        let (signer, from) = self.resolve_signer(signer)?;

        let mut tx = TxBuilder::default();
        tx.add_message(MsgSend {
            from_address: from.clone(),
            to_address: to.to_owned(),
            amount: vec![coin.into()],
        })
        .set_options(options);
        self.submit_and_wait(signer, &from, &tx, OperationKind::Transfer)
            .await
    }

    /// Vote on a governance proposal.
    pub async fn vote(
        &self,
        signer: Option<&dyn Signer>,
        proposal_id: u64,
        option: VoteOption,
        options: TxOptions,
    ) -> Result<TxReceipt> {
        let (signer, voter) = self.resolve_signer(signer)?;

        let mut tx = TxBuilder::default();
        tx.add_message(MsgVote {
            proposal_id,
            voter: voter.clone(),
            option: option as i32,
            metadata: String::new(),
        })
        .set_options(options);
        self.submit_and_wait(signer, &voter, &tx, OperationKind::Vote)
            .await
    }

    /// Simulate, sign, submit and wait for an arbitrary transaction.
    pub async fn sign_and_broadcast(
        &self,
        signer: Option<&dyn Signer>,
        tx: &TxBuilder,
        kind: OperationKind,
    ) -> Result<TxReceipt> {
        let (signer, address) = self.resolve_signer(signer)?;
        self.submit_and_wait(signer, &address, tx, kind).await
    }

    /// Single status lookup, `None` if the transaction is not on chain yet.
    pub async fn get_transaction(&self, txhash: &str) -> Result<Option<TxReceipt>> {
        self.query.get_transaction(txhash).await
    }

    /// Wait for a previously submitted transaction using the configured poll settings.
    pub async fn wait_for_transaction(&self, txhash: impl Into<String>) -> Result<TxReceipt> {
        wait_for_transaction(
            &self.query,
            txhash,
            PollSettings::from_builder(&self.builder),
        )
        .await
    }

    fn resolve_signer<'a>(
        &self,
        signer: Option<&'a dyn Signer>,
    ) -> Result<(&'a dyn Signer, String)> {
        let signer = signer.ok_or(Error::UnknownSigner)?;
        let address = signer.get_address_string();
        self.builder.hrp().assert_prefix(&address)?;
        Ok((signer, address))
    }

    async fn submit_and_wait(
        &self,
        signer: &dyn Signer,
        address: &str,
        tx: &TxBuilder,
        kind: OperationKind,
    ) -> Result<TxReceipt> {
        let FeeDecision { fee, .. } = self
            .estimator
            .estimate(&self.client, address, tx, kind)
            .await?;
        let txhash = self
            .client
            .sign_and_broadcast_sync(signer, &tx.messages, &fee, tx.memo_str())
            .await?;
        tracing::debug!("Transaction {txhash} accepted into the mempool");
        self.wait_for_transaction(txhash).await
    }
}

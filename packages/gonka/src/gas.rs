//! Gas limit and fee selection from a simulated transaction.

use cosmos_sdk_proto::cosmos::tx::v1beta1::Fee;

use crate::{
    gas_multiplier::{GasMultipliers, OperationKind},
    gas_price::GasPrice,
    ChainClient, GonkaBuilder, Result, TxBuilder,
};

/// The gas limit and fee chosen for a transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct FeeDecision {
    /// Gas reported by simulation
    pub simulated_gas: u64,
    /// Simulated gas scaled by the operation's multiplier, rounded up
    pub gas_limit: u64,
    /// Fee attached to the transaction
    pub fee: Fee,
}

/// Runs simulations and turns their result into a [FeeDecision].
#[derive(Clone, Debug)]
pub struct GasEstimator {
    multipliers: GasMultipliers,
    default_gas_price: GasPrice,
}

impl GasEstimator {
    /// Create an estimator with explicit settings.
    pub fn new(multipliers: GasMultipliers, default_gas_price: GasPrice) -> Self {
        GasEstimator {
            multipliers,
            default_gas_price,
        }
    }

    /// Create an estimator from connection settings.
    pub fn from_builder(builder: &GonkaBuilder) -> Self {
        Self::new(builder.gas_multipliers(), builder.get_gas_price())
    }

    /// Simulate the transaction and decide on its gas limit and fee.
    ///
    /// A fee set on the [TxBuilder] is used as-is. Otherwise the fee is
    /// `ceil(gas_limit * gas_price)`, using the transaction's gas price if it
    /// has one. Simulation errors are returned unchanged and never retried.
    pub async fn estimate<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        signer_address: &str,
        tx: &TxBuilder,
        kind: OperationKind,
    ) -> Result<FeeDecision> {
        let simulated_gas = client
            .simulate(signer_address, &tx.messages, tx.memo_str())
            .await?;
        let gas_limit = self.multipliers.gas_limit(simulated_gas, kind);

        let fee = match &tx.fee {
            Some(fee) => fee.clone(),
            None => {
                let gas_price = tx.gas_price.as_ref().unwrap_or(&self.default_gas_price);
                Fee {
                    amount: vec![gas_price.fee_for(gas_limit)?],
                    gas_limit,
                    payer: String::new(),
                    granter: String::new(),
                }
            }
        };

        tracing::debug!(
            "Simulated {simulated_gas} gas for {kind:?}, using gas limit {gas_limit} (multiplier {})",
            self.multipliers.get(kind)
        );

        Ok(FeeDecision {
            simulated_gas,
            gas_limit,
            fee,
        })
    }
}

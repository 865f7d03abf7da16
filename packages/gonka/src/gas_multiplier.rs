/// Default multiplier applied to simulated gas for token transfers.
///
/// Cosmos SDK 0.47 chains regularly run out of gas at 1.3.
pub const DEFAULT_TRANSFER_GAS_MULTIPLIER: f64 = 1.4;

/// Default multiplier applied to simulated gas for governance votes.
pub const DEFAULT_VOTE_GAS_MULTIPLIER: f64 = 1.5;

/// The kind of operation a transaction performs, used to select a gas multiplier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OperationKind {
    /// Bank transfers and any other generic transaction
    Transfer,
    /// Governance votes
    Vote,
}

/// Per-operation multipliers applied to simulated gas.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GasMultipliers {
    /// Multiplier for [OperationKind::Transfer].
    pub transfer: f64,
    /// Multiplier for [OperationKind::Vote].
    pub vote: f64,
}

impl Default for GasMultipliers {
    fn default() -> Self {
        GasMultipliers {
            transfer: DEFAULT_TRANSFER_GAS_MULTIPLIER,
            vote: DEFAULT_VOTE_GAS_MULTIPLIER,
        }
    }
}

impl GasMultipliers {
    /// The multiplier for the given operation.
    pub fn get(&self, kind: OperationKind) -> f64 {
        match kind {
            OperationKind::Transfer => self.transfer,
            OperationKind::Vote => self.vote,
        }
    }

    /// Gas limit for a simulated amount: the product rounded up to an integer.
    pub fn gas_limit(&self, simulated_gas: u64, kind: OperationKind) -> u64 {
        let gas_limit = (simulated_gas as f64 * self.get(kind)).ceil();
        if gas_limit >= u64::MAX as f64 {
            u64::MAX
        } else if gas_limit <= 0.0 {
            0
        } else {
            gas_limit as u64
        }
    }
}

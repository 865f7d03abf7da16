use std::{fmt::Display, sync::Arc};

use cosmos_sdk_proto::cosmos::tx::v1beta1::Fee;

use crate::{gas_price::GasPrice, messages::PrettyCoins};

/// Transaction builder
///
/// Collects the messages and per-transaction overrides that
/// [crate::TxBroadcaster::sign_and_broadcast] submits.
#[derive(Default, Clone, Debug)]
pub struct TxBuilder {
    pub(crate) messages: Vec<Arc<TxMessage>>,
    pub(crate) memo: Option<String>,
    pub(crate) fee: Option<Fee>,
    pub(crate) gas_price: Option<GasPrice>,
}

impl Display for TxBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(memo) = &self.memo {
            writeln!(f, "Memo: {memo}")?;
        }
        if let Some(fee) = &self.fee {
            writeln!(
                f,
                "Fee: {} for {} gas",
                PrettyCoins(fee.amount.as_slice()),
                fee.gas_limit
            )?;
        }
        for (idx, msg) in self.messages.iter().enumerate() {
            write!(f, "Message {idx}: {}", msg.description)?;
            if idx + 1 < self.messages.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl TxBuilder {
    /// Add a message to this transaction.
    pub fn add_message(&mut self, msg: impl Into<TxMessage>) -> &mut Self {
        self.messages.push(msg.into().into());
        self
    }

    /// The messages added so far.
    pub fn messages(&self) -> &[Arc<TxMessage>] {
        &self.messages
    }

    /// Set the memo field.
    pub fn set_memo(&mut self, memo: impl Into<String>) -> &mut Self {
        self.memo = Some(memo.into());
        self
    }

    /// Clear the memo field
    pub fn clear_memo(&mut self) -> &mut Self {
        self.memo = None;
        self
    }

    /// Either set or clear the memo field.
    pub fn set_optional_memo(&mut self, memo: impl Into<Option<String>>) -> &mut Self {
        self.memo = memo.into();
        self
    }

    /// The memo, or an empty string when none is set.
    pub fn memo_str(&self) -> &str {
        self.memo.as_deref().unwrap_or_default()
    }

    /// Use this fee instead of the one derived from simulation.
    ///
    /// Simulation still runs to determine the gas limit.
    pub fn set_fee(&mut self, fee: impl Into<Option<Fee>>) -> &mut Self {
        self.fee = fee.into();
        self
    }

    /// Use this gas price instead of the configured default.
    pub fn set_gas_price(&mut self, gas_price: impl Into<Option<GasPrice>>) -> &mut Self {
        self.gas_price = gas_price.into();
        self
    }

    /// Apply the overrides from a [TxOptions].
    pub fn set_options(&mut self, options: TxOptions) -> &mut Self {
        let TxOptions {
            memo,
            fee,
            gas_price,
        } = options;
        self.set_optional_memo(memo)
            .set_fee(fee)
            .set_gas_price(gas_price)
    }
}

/// Optional per-transaction overrides.
#[derive(Default, Clone, Debug)]
pub struct TxOptions {
    /// Memo attached to the transaction.
    pub memo: Option<String>,
    /// Fee to use in place of the computed one.
    pub fee: Option<Fee>,
    /// Gas price to use in place of the configured default.
    pub gas_price: Option<GasPrice>,
}

/// A message to include in a transaction.
#[derive(Debug)]
pub struct TxMessage {
    type_url: String,
    value: Vec<u8>,
    description: String,
}

impl TxMessage {
    /// Generate a new [TxMessage].
    pub fn new(
        type_url: impl Into<String>,
        value: Vec<u8>,
        description: impl Into<String>,
    ) -> Self {
        TxMessage {
            type_url: type_url.into(),
            value,
            description: description.into(),
        }
    }

    /// The protobuf type URL.
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    /// Human readable summary of the message.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get an [cosmos_sdk_proto::Any] value for including in a protobuf message.
    pub fn get_protobuf(&self) -> cosmos_sdk_proto::Any {
        cosmos_sdk_proto::Any {
            type_url: self.type_url.clone(),
            value: self.value.clone(),
        }
    }

    /// Set the description, useful if the raw message is very large and makes error messages hard to parse.
    pub fn set_description(&mut self, desc: impl Into<String>) {
        self.description = desc.into();
    }
}

#[cfg(test)]
mod tests {
    use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;

    use super::*;

    #[test]
    fn options_applied() {
        let mut builder = TxBuilder::default();
        builder.set_memo("first");
        assert_eq!(builder.memo_str(), "first");
        builder.set_options(TxOptions {
            memo: None,
            fee: Some(Fee {
                amount: vec![Coin {
                    denom: "ngonka".to_owned(),
                    amount: "5000".to_owned(),
                }],
                gas_limit: 200_000,
                payer: String::new(),
                granter: String::new(),
            }),
            gas_price: Some(GasPrice::default_for("ngonka")),
        });
        assert_eq!(builder.memo_str(), "");
        assert_eq!(builder.fee.as_ref().unwrap().gas_limit, 200_000);
        assert!(builder.gas_price.is_some());
    }

    #[test]
    fn display() {
        let mut builder = TxBuilder::default();
        builder
            .set_memo("hello")
            .add_message(TxMessage::new("/a", vec![], "first"))
            .add_message(TxMessage::new("/b", vec![], "second"));
        assert_eq!(
            builder.to_string(),
            "Memo: hello\nMessage 0: first\nMessage 1: second"
        );
        assert_eq!(builder.messages().len(), 2);
    }
}

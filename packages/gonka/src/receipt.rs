//! Transactions found on chain, as reported by the REST endpoint.

use chrono::{DateTime, Utc};

use crate::error::{ChainParseError, CosmosSdkError};

/// A transaction that has been included in a block.
///
/// Being found does not mean the transaction succeeded: a non-zero
/// [TxReceipt::code] is an on-chain execution failure.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TxReceipt {
    /// Transaction hash
    pub txhash: String,
    /// Height of the block that included the transaction
    pub height: i64,
    /// Result code, 0 on success
    pub code: u32,
    /// Module namespace for a non-zero code
    pub codespace: String,
    /// Raw log output from execution
    pub raw_log: String,
    /// Gas consumed by execution
    pub gas_used: u64,
    /// Gas limit the transaction was submitted with
    pub gas_wanted: u64,
    /// Events emitted during execution, in order
    pub events: Vec<TxEvent>,
    /// Block timestamp, see [TxReceipt::parse_timestamp]
    pub timestamp: String,
}

/// An event emitted by a transaction.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxEvent {
    /// Event type, e.g. `transfer`
    #[serde(rename = "type")]
    pub r#type: String,
    /// Attributes in emission order
    #[serde(default)]
    pub attributes: Vec<TxEventAttribute>,
}

/// A single key/value pair within a [TxEvent].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxEventAttribute {
    /// Attribute key
    pub key: String,
    /// Attribute value
    #[serde(default)]
    pub value: String,
    /// Whether the node indexed this attribute
    #[serde(default)]
    pub index: bool,
}

impl TxReceipt {
    /// Did the transaction execute successfully?
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// The SDK error for a failed transaction.
    pub fn error_code(&self) -> Option<CosmosSdkError> {
        (!self.is_success()).then(|| self.code.into())
    }

    /// Parse the timestamp of this transaction.
    pub fn parse_timestamp(&self) -> Result<DateTime<Utc>, ChainParseError> {
        self.timestamp
            .parse()
            .map_err(|source| ChainParseError::InvalidTimestamp {
                timestamp: self.timestamp.clone(),
                txhash: self.txhash.clone(),
                source,
            })
    }

    /// All values for the given attribute key within events of the given type.
    pub fn event_attributes<'a, 'b>(
        &'a self,
        event_type: &'b str,
        key: &'b str,
    ) -> impl Iterator<Item = &'a str> + 'b
    where
        'a: 'b,
    {
        self.events
            .iter()
            .filter(move |event| event.r#type == event_type)
            .flat_map(|event| event.attributes.iter())
            .filter(move |attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    /// The first value for the given attribute, if any.
    pub fn first_event_attribute(&self, event_type: &str, key: &str) -> Option<&str> {
        self.event_attributes(event_type, key).next()
    }
}

/// Body of `GET /cosmos/tx/v1beta1/txs/{hash}`.
#[derive(serde::Deserialize)]
pub(crate) struct GetTxResponseJson {
    #[serde(default)]
    tx_response: Option<serde_json::Value>,
}

#[derive(serde::Deserialize)]
struct TxResponseJson {
    #[serde(default)]
    txhash: String,
    height: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    codespace: String,
    #[serde(default)]
    raw_log: String,
    #[serde(default = "zero")]
    gas_used: String,
    #[serde(default = "zero")]
    gas_wanted: String,
    #[serde(default)]
    events: Vec<TxEvent>,
    #[serde(default)]
    timestamp: String,
}

fn zero() -> String {
    "0".to_owned()
}

impl GetTxResponseJson {
    /// Convert into a receipt, or `None` if the transaction was not found yet.
    pub(crate) fn into_receipt(self, txhash: &str) -> Result<Option<TxReceipt>, ChainParseError> {
        let tx_response = match self.tx_response {
            None | Some(serde_json::Value::Null) => return Ok(None),
            Some(serde_json::Value::Object(map)) if map.is_empty() => return Ok(None),
            Some(tx_response) => tx_response,
        };
        let TxResponseJson {
            txhash: reported_txhash,
            height,
            code,
            codespace,
            raw_log,
            gas_used,
            gas_wanted,
            events,
            timestamp,
        } = serde_json::from_value(tx_response).map_err(|e| {
            ChainParseError::InvalidTxResponse {
                txhash: txhash.to_owned(),
                message: e.to_string(),
            }
        })?;

        let txhash = if reported_txhash.is_empty() {
            txhash.to_owned()
        } else {
            reported_txhash
        };
        let number = |field, value: String| {
            value
                .parse::<u64>()
                .map_err(|source| ChainParseError::InvalidNumber {
                    field,
                    value,
                    txhash: txhash.clone(),
                    source,
                })
        };
        let gas_used = number("gas_used", gas_used)?;
        let gas_wanted = number("gas_wanted", gas_wanted)?;
        let height = height
            .parse::<i64>()
            .map_err(|source| ChainParseError::InvalidNumber {
                field: "height",
                value: height.clone(),
                txhash: txhash.clone(),
                source,
            })?;

        Ok(Some(TxReceipt {
            txhash,
            height,
            code,
            codespace,
            raw_log,
            gas_used,
            gas_wanted,
            events,
            timestamp,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUND: &str = r#"{
        "tx": {},
        "tx_response": {
            "height": "1234",
            "txhash": "ABC123",
            "codespace": "",
            "code": 0,
            "data": "",
            "raw_log": "",
            "logs": [],
            "info": "",
            "gas_wanted": "140000",
            "gas_used": "98765",
            "events": [
                {
                    "type": "transfer",
                    "attributes": [
                        {"key": "recipient", "value": "gonka1to", "index": true},
                        {"key": "amount", "value": "1500ngonka", "index": true}
                    ]
                },
                {"type": "message", "attributes": [{"key": "action", "value": "/cosmos.bank.v1beta1.MsgSend"}]}
            ],
            "timestamp": "2024-05-01T12:34:56Z"
        }
    }"#;

    fn parse(body: &str) -> Option<TxReceipt> {
        serde_json::from_str::<GetTxResponseJson>(body)
            .unwrap()
            .into_receipt("ABC123")
            .unwrap()
    }

    #[test]
    fn found_transaction() {
        let receipt = parse(FOUND).unwrap();
        assert_eq!(receipt.txhash, "ABC123");
        assert_eq!(receipt.height, 1234);
        assert_eq!(receipt.gas_used, 98765);
        assert_eq!(receipt.gas_wanted, 140_000);
        assert!(receipt.is_success());
        assert_eq!(receipt.error_code(), None);
        assert_eq!(
            receipt.first_event_attribute("transfer", "amount"),
            Some("1500ngonka")
        );
        assert_eq!(
            receipt
                .event_attributes("message", "action")
                .collect::<Vec<_>>(),
            vec!["/cosmos.bank.v1beta1.MsgSend"]
        );
        assert_eq!(receipt.first_event_attribute("transfer", "sender"), None);
        assert_eq!(
            receipt.parse_timestamp().unwrap().to_rfc3339(),
            "2024-05-01T12:34:56+00:00"
        );
    }

    #[test]
    fn attribute_outlives_lookup_keys() {
        let receipt = parse(FOUND).unwrap();
        let amount = {
            let event_type = String::from("transfer");
            let key = String::from("amount");
            receipt.first_event_attribute(&event_type, &key)
        };
        assert_eq!(amount, Some("1500ngonka"));
    }

    #[test]
    fn failed_transaction_is_still_found() {
        let body = r#"{"tx_response": {"height": "10", "txhash": "ABC123", "code": 5,
            "codespace": "sdk", "raw_log": "insufficient funds", "gas_used": "1", "gas_wanted": "2"}}"#;
        let receipt = parse(body).unwrap();
        assert!(!receipt.is_success());
        assert_eq!(receipt.error_code(), Some(CosmosSdkError::InsufficientFunds));
        assert_eq!(receipt.raw_log, "insufficient funds");
    }

    #[test]
    fn not_found() {
        assert_eq!(parse("{}"), None);
        assert_eq!(parse(r#"{"tx_response": null}"#), None);
        assert_eq!(parse(r#"{"tx_response": {}}"#), None);
        assert_eq!(
            parse(r#"{"code": 5, "message": "tx not found: ABC123", "details": []}"#),
            None
        );
    }

    #[test]
    fn malformed_numbers() {
        let body = r#"{"tx_response": {"height": "ten", "txhash": "ABC123"}}"#;
        let err = serde_json::from_str::<GetTxResponseJson>(body)
            .unwrap()
            .into_receipt("ABC123")
            .unwrap_err();
        assert!(matches!(
            err,
            ChainParseError::InvalidNumber { field: "height", .. }
        ));
    }
}

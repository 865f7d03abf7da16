//! Transaction status lookups against the REST (`/chain-api`) endpoint.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::{Action, BuilderError, QueryError, QueryErrorDetails},
    gonka_builder::join_url,
    receipt::GetTxResponseJson,
    Error, GonkaBuilder, TxReceipt,
};

/// Look up a transaction by hash.
#[async_trait]
pub trait TxStatusQuery: Send + Sync {
    /// Returns `Ok(None)` while the transaction has not been found on chain.
    ///
    /// Transport and decoding failures are errors; a found transaction with a
    /// non-zero code is not.
    async fn get_transaction(&self, txhash: &str) -> Result<Option<TxReceipt>, Error>;
}

#[async_trait]
impl<T: TxStatusQuery + ?Sized> TxStatusQuery for Arc<T> {
    async fn get_transaction(&self, txhash: &str) -> Result<Option<TxReceipt>, Error> {
        (**self).get_transaction(txhash).await
    }
}

/// HTTP client for the chain's REST API.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct RestClient {
    client: reqwest::Client,
    api_url: Arc<String>,
}

impl RestClient {
    /// Build a client for the REST endpoint described by the builder.
    pub fn new(builder: &GonkaBuilder) -> Result<Self, BuilderError> {
        let api_url = builder.api_url();
        let client = reqwest::Client::builder()
            .timeout(builder.get_request_timeout())
            .build()
            .map_err(|source| BuilderError::HttpClient {
                api_url: api_url.clone(),
                source,
            })?;
        Ok(Self::with_client(client, api_url))
    }

    /// Use an already configured [reqwest::Client].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        RestClient {
            client,
            api_url: Arc::new(api_url.into()),
        }
    }

    /// Base URL requests are made against.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn tx_url(&self, txhash: &str) -> String {
        join_url(&self.api_url, &format!("/cosmos/tx/v1beta1/txs/{txhash}"))
    }

    /// GET a path relative to the API URL and decode the JSON body.
    ///
    /// The body is decoded regardless of HTTP status, since the endpoint
    /// reports missing transactions with an error status and a JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        action: Action,
    ) -> Result<T, QueryError> {
        let make_error = |url: String, details| QueryError {
            action: action.clone(),
            url,
            details,
        };
        let res = match self.client.get(&url).send().await {
            Ok(res) => res,
            Err(source) => return Err(make_error(url, QueryErrorDetails::Network { source })),
        };
        let status = res.status();
        let body = match res.bytes().await {
            Ok(body) => body,
            Err(source) => {
                return Err(make_error(url, QueryErrorDetails::Body { status, source }))
            }
        };
        tracing::trace!("GET {url} returned {status}");
        serde_json::from_slice(&body)
            .map_err(|source| make_error(url, QueryErrorDetails::Json { status, source }))
    }
}

#[async_trait]
impl TxStatusQuery for RestClient {
    async fn get_transaction(&self, txhash: &str) -> Result<Option<TxReceipt>, Error> {
        let action = Action::GetTransaction(txhash.to_owned());
        let body: GetTxResponseJson = self.get_json(self.tx_url(txhash), action.clone()).await?;
        body.into_receipt(txhash)
            .map_err(|source| Error::ChainParse {
                source: source.into(),
                action,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_url() {
        let client = RestClient::new(&GonkaBuilder::mainnet()).unwrap();
        assert_eq!(client.api_url(), "http://node1.gonka.ai:8000/chain-api");
        assert_eq!(
            client.tx_url("ABC123"),
            "http://node1.gonka.ai:8000/chain-api/cosmos/tx/v1beta1/txs/ABC123"
        );

        let client = RestClient::with_client(reqwest::Client::new(), "http://localhost:1317/");
        assert_eq!(
            client.tx_url("ABC123"),
            "http://localhost:1317/cosmos/tx/v1beta1/txs/ABC123"
        );
    }

    #[tokio::test]
    async fn network_failure_is_query_error() {
        // Nothing listens on port 9 of the loopback interface
        let client = RestClient::with_client(reqwest::Client::new(), "http://127.0.0.1:9");
        let err = client.get_transaction("ABC123").await.unwrap_err();
        match err {
            Error::Query(QueryError {
                action: Action::GetTransaction(txhash),
                url,
                details: QueryErrorDetails::Network { .. },
            }) => {
                assert_eq!(txhash, "ABC123");
                assert_eq!(url, "http://127.0.0.1:9/cosmos/tx/v1beta1/txs/ABC123");
            }
            err => panic!("Unexpected error: {err:?}"),
        }
    }
}

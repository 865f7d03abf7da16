use std::{sync::Arc, time::Duration};

use crate::{
    gas_multiplier::{GasMultipliers, DEFAULT_TRANSFER_GAS_MULTIPLIER, DEFAULT_VOTE_GAS_MULTIPLIER},
    gas_price::GasPrice,
    AddressHrp,
};

/// Default node URL for Gonka mainnet.
pub const DEFAULT_NODE_URL: &str = "http://node1.gonka.ai";
/// Default Tendermint RPC port.
pub const DEFAULT_RPC_PORT: u16 = 26657;
/// Default REST API port.
pub const DEFAULT_API_PORT: u16 = 8000;
/// Default chain ID.
pub const DEFAULT_CHAIN_ID: &str = "gonka-mainnet";
/// Base denom fees and transfers are paid in.
pub const DEFAULT_DENOM: &str = "ngonka";

/// Connection settings for a Gonka network.
///
/// Immutable once handed to a [crate::TxBroadcaster] or [crate::RestClient].
/// Every setting except the node URL, chain ID, denom and HRP has a default
/// applied by its getter.
#[derive(Clone, Debug)]
pub struct GonkaBuilder {
    node_url: Arc<String>,
    chain_id: String,
    denom: String,
    hrp: AddressHrp,

    // Values with defaults
    rpc_port: Option<u16>,
    api_port: Option<u16>,
    gas_price: Option<GasPrice>,
    transfer_gas_multiplier: Option<f64>,
    vote_gas_multiplier: Option<f64>,
    poll_interval: Option<Duration>,
    poll_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl Default for GonkaBuilder {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl GonkaBuilder {
    /// Create a new [GonkaBuilder] with default options where possible.
    pub fn new(
        chain_id: impl Into<String>,
        denom: impl Into<String>,
        hrp: AddressHrp,
        node_url: impl Into<String>,
    ) -> GonkaBuilder {
        Self {
            node_url: Arc::new(node_url.into()),
            chain_id: chain_id.into(),
            denom: denom.into(),
            hrp,
            rpc_port: None,
            api_port: None,
            gas_price: None,
            transfer_gas_multiplier: None,
            vote_gas_multiplier: None,
            poll_interval: None,
            poll_timeout: None,
            request_timeout: None,
        }
    }

    /// Settings for Gonka mainnet.
    pub fn mainnet() -> GonkaBuilder {
        Self::new(
            DEFAULT_CHAIN_ID,
            DEFAULT_DENOM,
            AddressHrp::gonka(),
            DEFAULT_NODE_URL,
        )
    }

    /// Node URL as configured, possibly including a port.
    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// See [Self::node_url]
    pub fn set_node_url(&mut self, node_url: impl Into<String>) {
        self.node_url = node_url.into().into();
    }

    /// Node URL with any port and path removed.
    pub fn base_url(&self) -> &str {
        strip_port(&self.node_url)
    }

    /// Tendermint RPC endpoint handed to the signing client.
    pub fn rpc_url(&self) -> String {
        format!("{}:{}", self.base_url(), self.get_rpc_port())
    }

    /// REST endpoint used for transaction status queries.
    pub fn api_url(&self) -> String {
        format!("{}:{}/chain-api", self.base_url(), self.get_api_port())
    }

    /// Chain ID we want to communicate with
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// See [Self::chain_id]
    pub fn set_chain_id(&mut self, chain_id: String) {
        self.chain_id = chain_id;
    }

    /// Base denom for transfers and fees
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// See [Self::denom]
    pub fn set_denom(&mut self, denom: String) {
        self.denom = denom;
    }

    /// Human-readable part (HRP) of chain addresses
    pub fn hrp(&self) -> AddressHrp {
        self.hrp
    }

    /// See [Self::hrp]
    pub fn set_hrp(&mut self, hrp: AddressHrp) {
        self.hrp = hrp;
    }

    /// Tendermint RPC port
    ///
    /// Default: 26657
    pub fn get_rpc_port(&self) -> u16 {
        self.rpc_port.unwrap_or(DEFAULT_RPC_PORT)
    }

    /// See [Self::get_rpc_port]
    pub fn set_rpc_port(&mut self, rpc_port: Option<u16>) {
        self.rpc_port = rpc_port;
    }

    /// REST API port
    ///
    /// Default: 8000
    pub fn get_api_port(&self) -> u16 {
        self.api_port.unwrap_or(DEFAULT_API_PORT)
    }

    /// See [Self::get_api_port]
    pub fn set_api_port(&mut self, api_port: Option<u16>) {
        self.api_port = api_port;
    }

    /// Gas price used when a transaction does not override it
    ///
    /// Default: 0.025 of [Self::denom]
    pub fn get_gas_price(&self) -> GasPrice {
        self.gas_price
            .clone()
            .unwrap_or_else(|| GasPrice::default_for(self.denom.clone()))
    }

    /// See [Self::get_gas_price]
    pub fn set_gas_price(&mut self, gas_price: Option<GasPrice>) {
        self.gas_price = gas_price;
    }

    /// Multiplier applied to simulated gas for transfers
    ///
    /// Default: 1.4
    pub fn get_transfer_gas_multiplier(&self) -> f64 {
        self.transfer_gas_multiplier
            .unwrap_or(DEFAULT_TRANSFER_GAS_MULTIPLIER)
    }

    /// See [Self::get_transfer_gas_multiplier]
    pub fn set_transfer_gas_multiplier(&mut self, multiplier: Option<f64>) {
        self.transfer_gas_multiplier = multiplier;
    }

    /// Multiplier applied to simulated gas for governance votes
    ///
    /// Default: 1.5
    pub fn get_vote_gas_multiplier(&self) -> f64 {
        self.vote_gas_multiplier
            .unwrap_or(DEFAULT_VOTE_GAS_MULTIPLIER)
    }

    /// See [Self::get_vote_gas_multiplier]
    pub fn set_vote_gas_multiplier(&mut self, multiplier: Option<f64>) {
        self.vote_gas_multiplier = multiplier;
    }

    /// Both gas multipliers together.
    pub fn gas_multipliers(&self) -> GasMultipliers {
        GasMultipliers {
            transfer: self.get_transfer_gas_multiplier(),
            vote: self.get_vote_gas_multiplier(),
        }
    }

    /// How long to wait between transaction status queries
    ///
    /// Default: 3 seconds
    pub fn get_poll_interval(&self) -> Duration {
        self.poll_interval.unwrap_or(Duration::from_secs(3))
    }

    /// See [Self::get_poll_interval]
    pub fn set_poll_interval(&mut self, poll_interval: Option<Duration>) {
        self.poll_interval = poll_interval;
    }

    /// How long to wait for a submitted transaction to appear on chain
    ///
    /// Default: 60 seconds
    pub fn get_poll_timeout(&self) -> Duration {
        self.poll_timeout.unwrap_or(Duration::from_secs(60))
    }

    /// See [Self::get_poll_timeout]
    pub fn set_poll_timeout(&mut self, poll_timeout: Option<Duration>) {
        self.poll_timeout = poll_timeout;
    }

    /// Timeout for a single HTTP request to the REST endpoint
    ///
    /// Default: 30 seconds
    pub fn get_request_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or(Duration::from_secs(30))
    }

    /// See [Self::get_request_timeout]
    pub fn set_request_timeout(&mut self, request_timeout: Option<Duration>) {
        self.request_timeout = request_timeout;
    }
}

/// Remove any `:port` (and anything after it) from an `http(s)://host` URL.
///
/// URLs with other schemes are returned unchanged.
fn strip_port(url: &str) -> &str {
    let scheme_len = if url.starts_with("http://") {
        "http://".len()
    } else if url.starts_with("https://") {
        "https://".len()
    } else {
        return url;
    };
    let host = &url[scheme_len..];
    match host.find([':', '/']) {
        Some(0) => url,
        Some(end) => &url[..scheme_len + end],
        None => url,
    }
}

/// Join a base URL and a path, collapsing repeated slashes outside the scheme.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    let full = format!("{base}/{path}");
    let (scheme, rest) = match full.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, full.as_str()),
    };

    let mut joined = String::with_capacity(full.len());
    if let Some(scheme) = scheme {
        joined.push_str(scheme);
        joined.push_str("://");
    }
    let mut prev_slash = false;
    for c in rest.chars() {
        let is_slash = c == '/';
        if !(is_slash && prev_slash) {
            joined.push(c);
        }
        prev_slash = is_slash;
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_defaults() {
        let builder = GonkaBuilder::mainnet();
        assert_eq!(builder.rpc_url(), "http://node1.gonka.ai:26657");
        assert_eq!(builder.api_url(), "http://node1.gonka.ai:8000/chain-api");
        assert_eq!(builder.chain_id(), "gonka-mainnet");
        assert_eq!(builder.denom(), "ngonka");
        assert_eq!(builder.hrp(), AddressHrp::gonka());
        assert_eq!(builder.get_gas_price().to_string(), "0.025ngonka");
        assert_eq!(builder.gas_multipliers(), GasMultipliers::default());
        assert_eq!(builder.get_poll_interval(), Duration::from_secs(3));
        assert_eq!(builder.get_poll_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn node_url_port_is_replaced() {
        let mut builder = GonkaBuilder::mainnet();
        builder.set_node_url("https://example.com:1317");
        builder.set_api_port(Some(9000));
        builder.set_rpc_port(Some(443));
        assert_eq!(builder.base_url(), "https://example.com");
        assert_eq!(builder.rpc_url(), "https://example.com:443");
        assert_eq!(builder.api_url(), "https://example.com:9000/chain-api");
    }

    #[test]
    fn strip_port_cases() {
        assert_eq!(strip_port("http://node1.gonka.ai"), "http://node1.gonka.ai");
        assert_eq!(strip_port("http://node1.gonka.ai:8000"), "http://node1.gonka.ai");
        assert_eq!(strip_port("http://10.0.0.1:26657/"), "http://10.0.0.1");
        assert_eq!(strip_port("http://host/path"), "http://host");
        assert_eq!(strip_port("localhost:8000"), "localhost:8000");
    }

    #[test]
    fn join_collapses_slashes() {
        assert_eq!(
            join_url("http://node1.gonka.ai:8000/chain-api", "/cosmos/tx/v1beta1/txs/ABC"),
            "http://node1.gonka.ai:8000/chain-api/cosmos/tx/v1beta1/txs/ABC"
        );
        assert_eq!(
            join_url("https://host/chain-api/", "//status"),
            "https://host/chain-api/status"
        );
        assert_eq!(join_url("host", "path"), "host/path");
    }
}

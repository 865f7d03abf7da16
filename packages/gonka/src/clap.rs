//! Provides helpers for generating Gonka values from command line parameters.

use std::{path::PathBuf, time::Duration};

use crate::{gas_price::GasPrice, AddressHrp, GonkaBuilder};

/// Command line options for connecting to a Gonka network
#[derive(clap::Parser, Clone, Debug)]
pub struct GonkaOpt {
    /// Named network profile, see the config file
    #[clap(long, env = "GONKA_NETWORK", global = true)]
    pub network: Option<String>,
    /// Config file to load network profiles from
    #[clap(long, env = "GONKA_CONFIG", global = true)]
    pub config: Option<PathBuf>,
    /// Optional node URL override, e.g. http://node1.gonka.ai
    #[clap(long, env = "GONKA_NODE_URL", global = true)]
    pub node_url: Option<String>,
    /// Optional Tendermint RPC port override
    #[clap(long, env = "GONKA_RPC_PORT", global = true)]
    pub rpc_port: Option<u16>,
    /// Optional REST API port override
    #[clap(long, env = "GONKA_API_PORT", global = true)]
    pub api_port: Option<u16>,
    /// Optional chain ID override
    #[clap(long, env = "GONKA_CHAIN_ID", global = true)]
    pub chain_id: Option<String>,
    /// Base denom (e.g. ngonka)
    #[clap(long, global = true, env = "GONKA_DENOM")]
    denom: Option<String>,
    /// Human readable part (HRP) of wallet addresses
    #[clap(long, global = true, env = "GONKA_HRP")]
    hrp: Option<AddressHrp>,
    /// Default gas price, e.g. 0.025ngonka
    #[clap(long, global = true, env = "GONKA_GAS_PRICE")]
    gas_price: Option<GasPrice>,
    /// Gas multiplier for transfers
    #[clap(long, global = true, env = "GONKA_TRANSFER_GAS_MULTIPLIER")]
    transfer_gas_multiplier: Option<f64>,
    /// Gas multiplier for governance votes
    #[clap(long, global = true, env = "GONKA_VOTE_GAS_MULTIPLIER")]
    vote_gas_multiplier: Option<f64>,
    /// Milliseconds between transaction status queries
    #[clap(long, global = true, env = "GONKA_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,
    /// Milliseconds to wait for a transaction before giving up
    #[clap(long, global = true, env = "GONKA_POLL_TIMEOUT_MS")]
    poll_timeout_ms: Option<u64>,
}

/// Errors for working with [GonkaOpt]
#[derive(thiserror::Error, Debug)]
#[allow(missing_docs)]
pub enum GonkaOptError {
    #[cfg(feature = "config")]
    #[error(transparent)]
    Config {
        #[from]
        source: crate::config::GonkaConfigError,
    },
    #[cfg(not(feature = "config"))]
    #[error("Unknown network {network:?}, only \"mainnet\" is built in. Enable the config feature for named profiles")]
    UnknownNetwork { network: String },
}

impl GonkaOpt {
    /// Convert these options into a new [GonkaBuilder].
    pub fn into_builder(self) -> Result<GonkaBuilder, GonkaOptError> {
        let GonkaOpt {
            network,
            config,
            node_url,
            rpc_port,
            api_port,
            chain_id,
            denom,
            hrp,
            gas_price,
            transfer_gas_multiplier,
            vote_gas_multiplier,
            poll_interval_ms,
            poll_timeout_ms,
        } = self;

        let mut builder = base_builder(network, config)?;
        if let Some(node_url) = node_url {
            builder.set_node_url(node_url);
        }
        if let Some(chain_id) = chain_id {
            builder.set_chain_id(chain_id);
        }
        if let Some(denom) = denom {
            builder.set_denom(denom);
        }
        if let Some(hrp) = hrp {
            builder.set_hrp(hrp);
        }
        if rpc_port.is_some() {
            builder.set_rpc_port(rpc_port);
        }
        if api_port.is_some() {
            builder.set_api_port(api_port);
        }
        if gas_price.is_some() {
            builder.set_gas_price(gas_price);
        }
        if transfer_gas_multiplier.is_some() {
            builder.set_transfer_gas_multiplier(transfer_gas_multiplier);
        }
        if vote_gas_multiplier.is_some() {
            builder.set_vote_gas_multiplier(vote_gas_multiplier);
        }
        if let Some(ms) = poll_interval_ms {
            builder.set_poll_interval(Some(Duration::from_millis(ms)));
        }
        if let Some(ms) = poll_timeout_ms {
            builder.set_poll_timeout(Some(Duration::from_millis(ms)));
        }

        Ok(builder)
    }
}

#[cfg(feature = "config")]
fn base_builder(
    network: Option<String>,
    config: Option<PathBuf>,
) -> Result<GonkaBuilder, GonkaOptError> {
    use crate::config::{GonkaConfig, MAINNET};

    let config = match config {
        Some(path) => GonkaConfig::load_from(&path, true)?,
        None => GonkaConfig::load()?,
    };
    Ok(config.builder_for(network.as_deref().unwrap_or(MAINNET))?)
}

#[cfg(not(feature = "config"))]
fn base_builder(
    network: Option<String>,
    _config: Option<PathBuf>,
) -> Result<GonkaBuilder, GonkaOptError> {
    match network {
        Some(network) if network != "mainnet" => Err(GonkaOptError::UnknownNetwork { network }),
        _ => Ok(GonkaBuilder::mainnet()),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use figment::Jail;

    use super::*;

    #[test]
    fn overrides_applied() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("gonka.toml", "[network.mainnet]\n")?;
            let opt = GonkaOpt::try_parse_from([
                "gonka",
                "--config",
                "gonka.toml",
                "--node-url",
                "https://rpc.example:1234",
                "--api-port",
                "1317",
                "--gas-price",
                "0.1ngonka",
                "--vote-gas-multiplier",
                "2",
                "--poll-timeout-ms",
                "1500",
            ])
            .unwrap();
            let builder = opt.into_builder().unwrap();
            assert_eq!(builder.api_url(), "https://rpc.example:1317/chain-api");
            assert_eq!(builder.get_gas_price().to_string(), "0.1ngonka");
            assert_eq!(builder.get_vote_gas_multiplier(), 2.0);
            assert_eq!(builder.get_transfer_gas_multiplier(), 1.4);
            assert_eq!(builder.get_poll_timeout(), Duration::from_millis(1500));
            Ok(())
        });
    }

    #[test]
    fn environment_fallbacks() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("gonka.toml", "[network.mainnet]\n")?;
            jail.set_env("GONKA_CONFIG", "gonka.toml");
            jail.set_env("GONKA_CHAIN_ID", "gonka-testnet");
            let builder = GonkaOpt::try_parse_from(["gonka"])
                .unwrap()
                .into_builder()
                .unwrap();
            assert_eq!(builder.chain_id(), "gonka-testnet");
            assert_eq!(builder.node_url(), "http://node1.gonka.ai");
            Ok(())
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn named_network_from_config() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "gonka.toml",
                r#"
                [network.local]
                node-url = "http://localhost"
                chain-id = "gonka-local"
                "#,
            )?;
            let builder = GonkaOpt::try_parse_from([
                "gonka",
                "--config",
                "gonka.toml",
                "--network",
                "local",
            ])
            .unwrap()
            .into_builder()
            .unwrap();
            assert_eq!(builder.api_url(), "http://localhost:8000/chain-api");
            assert_eq!(builder.chain_id(), "gonka-local");
            Ok(())
        });
    }
}

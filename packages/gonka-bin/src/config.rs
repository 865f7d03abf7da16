use std::str::FromStr;

use anyhow::Result;
use gonka::config::{GonkaConfig, GonkaConfigError};

#[derive(clap::Parser)]
pub(crate) enum Opt {
    /// Print the location of the config file
    File {},
    /// Print the values from the config
    Print {},
    /// Configure a new network
    ///
    /// Fields other than the node URL and chain ID fall back to mainnet values.
    /// Use the set subcommand to change them afterwards.
    NewNetwork {
        /// Name to be used for this network
        #[clap(long)]
        name: String,
        /// Node URL, e.g. http://node1.gonka.ai
        #[clap(long)]
        node_url: String,
        /// Chain ID
        #[clap(long)]
        chain_id: String,
    },
    /// Set a config value for a specific network
    Set {
        /// Network name
        name: String,
        /// Config key
        key: ConfigKey,
        /// Value
        value: String,
    },
}

#[derive(serde::Deserialize, Clone, Copy, Debug)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ConfigKey {
    NodeUrl,
    RpcPort,
    ApiPort,
    ChainId,
    Hrp,
    Denom,
    GasPrice,
    TransferGasMultiplier,
    VoteGasMultiplier,
    PollIntervalMs,
    PollTimeoutMs,
}

impl FromStr for ConfigKey {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
    }
}

fn load(opt: &crate::cli::Opt) -> Result<GonkaConfig, GonkaConfigError> {
    opt.network_opt
        .config
        .as_ref()
        .map_or_else(GonkaConfig::load, |path| GonkaConfig::load_from(path, true))
}

pub(crate) fn go(opt: crate::cli::Opt, inner: Opt) -> Result<()> {
    match inner {
        Opt::File {} => {
            match opt.network_opt.config {
                Some(file) => {
                    tracing::info!(
                        "Config file overridden by command line parameter or environment variable"
                    );
                    println!("{}", file.display());
                }
                None => {
                    println!("{}", GonkaConfig::default_file()?.display())
                }
            }
            Ok(())
        }
        Opt::Print {} => {
            let config = load(&opt)?;
            config.print();
            Ok(())
        }
        Opt::NewNetwork {
            name,
            node_url,
            chain_id,
        } => {
            let mut config = load(&opt)?;
            config.new_network(name, node_url, chain_id);
            config.save()?;
            println!("Changes saved");
            Ok(())
        }
        Opt::Set { name, key, value } => {
            let mut config = load(&opt)?;
            match key {
                ConfigKey::NodeUrl => config.set_node_url(name, value),
                ConfigKey::RpcPort => config.set_ports(name, Some(value.parse()?), None),
                ConfigKey::ApiPort => config.set_ports(name, None, Some(value.parse()?)),
                ConfigKey::ChainId => config.set_chain_id(name, value),
                ConfigKey::Hrp => config.set_hrp(name, value.parse()?),
                ConfigKey::Denom => config.set_denom(name, value),
                ConfigKey::GasPrice => config.set_gas_price(name, value.parse()?),
                ConfigKey::TransferGasMultiplier => {
                    config.set_gas_multipliers(name, Some(value.parse()?), None)
                }
                ConfigKey::VoteGasMultiplier => {
                    config.set_gas_multipliers(name, None, Some(value.parse()?))
                }
                ConfigKey::PollIntervalMs => config.set_poll(name, Some(value.parse()?), None),
                ConfigKey::PollTimeoutMs => config.set_poll(name, None, Some(value.parse()?)),
            }
            config.save()?;
            println!("Changes saved");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_key_names() {
        assert!(matches!(
            "transfer-gas-multiplier".parse::<ConfigKey>().unwrap(),
            ConfigKey::TransferGasMultiplier
        ));
        assert!(matches!(
            "node-url".parse::<ConfigKey>().unwrap(),
            ConfigKey::NodeUrl
        ));
        "grpc".parse::<ConfigKey>().unwrap_err();
    }
}

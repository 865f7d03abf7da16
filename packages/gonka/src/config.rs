//! Named network profiles loaded from a TOML file and the environment.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

use crate::{gas_price::GasPrice, AddressHrp, GonkaBuilder};

/// Name of the built-in network.
pub const MAINNET: &str = "mainnet";

/// Configuration overrides for individual network
#[derive(Debug)]
pub struct GonkaConfig {
    path: PathBuf,
    inner: GonkaConfigInner,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
struct GonkaConfigInner {
    #[serde(default)]
    network: HashMap<String, NetworkConfig>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct NetworkConfig {
    node_url: Option<String>,
    rpc_port: Option<u16>,
    api_port: Option<u16>,
    chain_id: Option<String>,
    denom: Option<String>,
    hrp: Option<AddressHrp>,
    gas_price: Option<GasPrice>,
    transfer_gas_multiplier: Option<f64>,
    vote_gas_multiplier: Option<f64>,
    poll_interval_ms: Option<u64>,
    poll_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
}

impl NetworkConfig {
    fn apply(&self, builder: &mut GonkaBuilder) {
        if let Some(node_url) = &self.node_url {
            builder.set_node_url(node_url);
        }
        if let Some(chain_id) = self.chain_id.clone() {
            builder.set_chain_id(chain_id);
        }
        if let Some(denom) = self.denom.clone() {
            builder.set_denom(denom);
        }
        if let Some(hrp) = self.hrp {
            builder.set_hrp(hrp);
        }
        if self.rpc_port.is_some() {
            builder.set_rpc_port(self.rpc_port);
        }
        if self.api_port.is_some() {
            builder.set_api_port(self.api_port);
        }
        if self.gas_price.is_some() {
            builder.set_gas_price(self.gas_price.clone());
        }
        if self.transfer_gas_multiplier.is_some() {
            builder.set_transfer_gas_multiplier(self.transfer_gas_multiplier);
        }
        if self.vote_gas_multiplier.is_some() {
            builder.set_vote_gas_multiplier(self.vote_gas_multiplier);
        }
        if let Some(ms) = self.poll_interval_ms {
            builder.set_poll_interval(Some(Duration::from_millis(ms)));
        }
        if let Some(ms) = self.poll_timeout_ms {
            builder.set_poll_timeout(Some(Duration::from_millis(ms)));
        }
        if let Some(ms) = self.request_timeout_ms {
            builder.set_request_timeout(Some(Duration::from_millis(ms)));
        }
    }
}

/// Errors which can occur while loading the config file.
#[derive(thiserror::Error, Debug)]
#[allow(missing_docs)]
pub enum GonkaConfigError {
    #[error("Config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("Misconfiguration detected, unable to find your default config file location")]
    ProjectDirsNotFound,
    #[error("Error loading config file {}: {source}", path.display())]
    ConfigLoadError {
        source: Box<figment::Error>,
        path: PathBuf,
    },
    #[error("Unknown network {network:?} specified, not \"mainnet\" or found in config {}", config.display())]
    UnknownNetwork { network: String, config: PathBuf },
    #[error("Missing required config values for network {network:?} in config file {}: {missing}", path.display())]
    MissingRequiredConfig {
        missing: String,
        path: PathBuf,
        network: String,
    },
    #[error(transparent)]
    TomlSerialization { source: toml::ser::Error },
    #[error("Unable to write config to {}: {source}", path.display())]
    ConfigWrite {
        source: std::io::Error,
        path: PathBuf,
    },
}

impl GonkaConfig {
    /// Find the default config file location
    pub fn default_file() -> Result<PathBuf, GonkaConfigError> {
        let dirs = directories::ProjectDirs::from("ai", "gonka", "gonka")
            .ok_or(GonkaConfigError::ProjectDirsNotFound)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load the config values from the default config file location
    pub fn load() -> Result<GonkaConfig, GonkaConfigError> {
        Self::load_from(&Self::default_file()?, false)
    }

    /// Load the config values from the specified file
    pub fn load_from(config: &Path, required: bool) -> Result<GonkaConfig, GonkaConfigError> {
        if required && !config.exists() {
            return Err(GonkaConfigError::FileNotFound {
                path: config.to_owned(),
            });
        }
        let inner = Figment::new()
            .merge(Toml::file(config))
            .merge(Env::prefixed("GONKA_CONFIG_"))
            .extract()
            .map_err(|source| GonkaConfigError::ConfigLoadError {
                source: Box::new(source),
                path: config.to_owned(),
            })?;
        Ok(GonkaConfig {
            path: config.to_owned(),
            inner,
        })
    }

    /// Location this config was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Generate a builder for the given network name
    ///
    /// [MAINNET] starts from the built-in defaults. Any other name must be
    /// present in the config file with at least a `node-url`; its remaining
    /// settings fall back to the mainnet defaults.
    pub fn builder_for(&self, network: &str) -> Result<GonkaBuilder, GonkaConfigError> {
        match (network == MAINNET, self.inner.network.get(network)) {
            (false, None) => Err(GonkaConfigError::UnknownNetwork {
                network: network.to_owned(),
                config: self.path.clone(),
            }),
            (false, Some(config)) if config.node_url.is_none() => {
                Err(GonkaConfigError::MissingRequiredConfig {
                    missing: "node-url".to_owned(),
                    path: self.path.clone(),
                    network: network.to_owned(),
                })
            }
            (_, config) => {
                let mut builder = GonkaBuilder::mainnet();
                if let Some(config) = config {
                    config.apply(&mut builder);
                }
                Ok(builder)
            }
        }
    }

    /// Print out a description of the config file
    pub fn print(&self) {
        println!("Location: {}", self.path.display());
        let mut networks = self.inner.network.iter().collect::<Vec<_>>();
        networks.sort_by_key(|x| x.0);
        for (
            network,
            NetworkConfig {
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
                request_timeout_ms,
            },
        ) in networks
        {
            println!();
            println!("{network}");
            if let Some(node_url) = node_url {
                println!("Node URL: {node_url}");
            }
            if let Some(rpc_port) = rpc_port {
                println!("RPC port: {rpc_port}");
            }
            if let Some(api_port) = api_port {
                println!("API port: {api_port}");
            }
            if let Some(chain_id) = chain_id {
                println!("Chain ID: {chain_id}");
            }
            if let Some(denom) = denom {
                println!("Denom: {denom}");
            }
            if let Some(hrp) = hrp {
                println!("Address prefix (HRP): {hrp}");
            }
            if let Some(gas_price) = gas_price {
                println!("Gas price: {gas_price}");
            }
            if let Some(multiplier) = transfer_gas_multiplier {
                println!("Transfer gas multiplier: {multiplier}");
            }
            if let Some(multiplier) = vote_gas_multiplier {
                println!("Vote gas multiplier: {multiplier}");
            }
            if let Some(ms) = poll_interval_ms {
                println!("Poll interval: {ms}ms");
            }
            if let Some(ms) = poll_timeout_ms {
                println!("Poll timeout: {ms}ms");
            }
            if let Some(ms) = request_timeout_ms {
                println!("Request timeout: {ms}ms");
            }
        }
    }

    /// Add a new network to the config
    pub fn new_network(&mut self, name: String, node_url: String, chain_id: String) {
        self.inner.network.insert(
            name,
            NetworkConfig {
                node_url: Some(node_url),
                chain_id: Some(chain_id),
                ..NetworkConfig::default()
            },
        );
    }

    /// Write the config to the original file.
    pub fn save(&self) -> Result<(), GonkaConfigError> {
        self.save_to(&self.path)
    }

    /// Write the config to the given file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), GonkaConfigError> {
        let s = toml::to_string_pretty(&self.inner)
            .map_err(|source| GonkaConfigError::TomlSerialization { source })?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent).map_err(|source| GonkaConfigError::ConfigWrite {
                source,
                path: path.to_owned(),
            })?;
        }
        fs_err::write(path, s).map_err(|source| GonkaConfigError::ConfigWrite {
            source,
            path: path.to_owned(),
        })
    }

    /// Set the node URL
    pub fn set_node_url(&mut self, name: String, url: String) {
        self.inner.network.entry(name).or_default().node_url = Some(url);
    }

    /// Set the RPC and REST ports
    pub fn set_ports(&mut self, name: String, rpc_port: Option<u16>, api_port: Option<u16>) {
        let network = self.inner.network.entry(name).or_default();
        if rpc_port.is_some() {
            network.rpc_port = rpc_port;
        }
        if api_port.is_some() {
            network.api_port = api_port;
        }
    }

    /// Set the chain ID
    pub fn set_chain_id(&mut self, name: String, chain_id: String) {
        self.inner.network.entry(name).or_default().chain_id = Some(chain_id);
    }

    /// Set the Human Readable Part (HRP)
    pub fn set_hrp(&mut self, name: String, hrp: AddressHrp) {
        self.inner.network.entry(name).or_default().hrp = Some(hrp);
    }

    /// Set the denom
    pub fn set_denom(&mut self, name: String, denom: String) {
        self.inner.network.entry(name).or_default().denom = Some(denom);
    }

    /// Set the default gas price
    pub fn set_gas_price(&mut self, name: String, gas_price: GasPrice) {
        self.inner.network.entry(name).or_default().gas_price = Some(gas_price);
    }

    /// Set the gas multipliers
    pub fn set_gas_multipliers(
        &mut self,
        name: String,
        transfer: Option<f64>,
        vote: Option<f64>,
    ) {
        let network = self.inner.network.entry(name).or_default();
        if transfer.is_some() {
            network.transfer_gas_multiplier = transfer;
        }
        if vote.is_some() {
            network.vote_gas_multiplier = vote;
        }
    }

    /// Set the poll interval and timeout, in milliseconds
    pub fn set_poll(&mut self, name: String, interval_ms: Option<u64>, timeout_ms: Option<u64>) {
        let network = self.inner.network.entry(name).or_default();
        if interval_ms.is_some() {
            network.poll_interval_ms = interval_ms;
        }
        if timeout_ms.is_some() {
            network.poll_timeout_ms = timeout_ms;
        }
    }
}

impl GonkaBuilder {
    /// Generate a builder for the named network, respecting the default config file.
    pub fn with_config(network: &str) -> Result<GonkaBuilder, GonkaConfigError> {
        GonkaConfig::load()?.builder_for(network)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn mainnet_without_file() {
        Jail::expect_with(|_jail| {
            let config = GonkaConfig::load_from(Path::new("missing.toml"), false).unwrap();
            let builder = config.builder_for(MAINNET).unwrap();
            assert_eq!(builder.api_url(), "http://node1.gonka.ai:8000/chain-api");
            GonkaConfig::load_from(Path::new("missing.toml"), true).unwrap_err();
            Ok(())
        });
    }

    #[test]
    fn custom_network_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gonka.toml",
                r#"
                [network.mainnet]
                gas-price = "0.05ngonka"

                [network.local]
                node-url = "http://localhost:9999"
                api-port = 1317
                chain-id = "gonka-local"
                poll-timeout-ms = 5000

                [network.broken]
                chain-id = "no-url"
                "#,
            )?;
            let config = GonkaConfig::load_from(Path::new("gonka.toml"), true).unwrap();

            let mainnet = config.builder_for(MAINNET).unwrap();
            assert_eq!(mainnet.get_gas_price().to_string(), "0.05ngonka");

            let local = config.builder_for("local").unwrap();
            assert_eq!(local.api_url(), "http://localhost:1317/chain-api");
            assert_eq!(local.rpc_url(), "http://localhost:26657");
            assert_eq!(local.chain_id(), "gonka-local");
            assert_eq!(local.get_poll_timeout(), Duration::from_secs(5));

            assert!(matches!(
                config.builder_for("broken"),
                Err(GonkaConfigError::MissingRequiredConfig { .. })
            ));
            assert!(matches!(
                config.builder_for("unknown"),
                Err(GonkaConfigError::UnknownNetwork { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn save_and_reload() {
        Jail::expect_with(|_jail| {
            let mut config = GonkaConfig::load_from(Path::new("nested/config.toml"), false).unwrap();
            config.new_network(
                "devnet".to_owned(),
                "https://devnet.example".to_owned(),
                "gonka-devnet".to_owned(),
            );
            config.set_gas_multipliers("devnet".to_owned(), Some(2.0), None);
            config.save().unwrap();

            let reloaded = GonkaConfig::load_from(Path::new("nested/config.toml"), true).unwrap();
            let builder = reloaded.builder_for("devnet").unwrap();
            assert_eq!(builder.chain_id(), "gonka-devnet");
            assert_eq!(builder.get_transfer_gas_multiplier(), 2.0);
            assert_eq!(builder.get_vote_gas_multiplier(), 1.5);
            Ok(())
        });
    }
}

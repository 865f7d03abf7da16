use anyhow::Result;
use gonka::clap::GonkaOpt;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{address, config, denom, tx};

/// Command line tool for interacting with the Gonka chain
#[derive(clap::Parser)]
pub(crate) struct Cmd {
    #[clap(flatten)]
    pub(crate) opt: Opt,
    #[clap(subcommand)]
    pub(crate) subcommand: Subcommand,
}

#[derive(clap::Parser)]
pub(crate) struct Opt {
    #[clap(flatten)]
    pub(crate) network_opt: GonkaOpt,
    /// Turn on verbose output
    #[clap(long, short, global = true)]
    verbose: bool,
}

impl Opt {
    pub(crate) fn init_logger(&self) -> Result<()> {
        let mut filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

        if self.verbose {
            filter = filter.add_directive("gonka=debug".parse()?);
            filter = filter.add_directive(format!("{}=debug", env!("CARGO_CRATE_NAME")).parse()?);
        };

        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(std::io::stderr)
                .and_then(filter),
        );

        subscriber.init();
        Ok(())
    }
}

#[derive(clap::Parser)]
pub(crate) enum Subcommand {
    /// Show the effective connection settings
    ShowConfig {},
    /// Convert between display and base denominations
    Denom {
        #[clap(flatten)]
        opt: denom::Opt,
    },
    /// Address validation
    Address {
        #[clap(flatten)]
        opt: address::Opt,
    },
    /// Look up submitted transactions
    Tx {
        #[clap(flatten)]
        opt: tx::Opt,
    },
    /// Manage the config file
    Config {
        #[clap(subcommand)]
        opt: config::Opt,
    },
    /// Generate bash shell completion script
    GenerateShellCompletions {
        /// Which shell to generate for
        #[clap(default_value_t = clap_complete::Shell::Bash)]
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn command_is_valid() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn parses_nested_subcommand() {
        let cmd = Cmd::try_parse_from(["gonka", "denom", "to-base", "1.5", "--decimals", "6"])
            .unwrap();
        assert!(matches!(cmd.subcommand, Subcommand::Denom { .. }));
    }
}

mod address;
mod cli;
mod config;
mod denom;
mod tx;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Subcommand;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = cli::Cmd::parse();
    cmd.opt.init_logger()?;

    tracing::debug!("Verbose logging enabled");

    cmd.subcommand.go(cmd.opt).await
}

impl Subcommand {
    pub(crate) async fn go(self, opt: cli::Opt) -> Result<()> {
        match self {
            Subcommand::ShowConfig {} => {
                let builder = opt.network_opt.into_builder()?;
                println!("Node URL: {}", builder.node_url());
                println!("RPC URL: {}", builder.rpc_url());
                println!("REST API URL: {}", builder.api_url());
                println!("Chain ID: {}", builder.chain_id());
                println!("Denom: {}", builder.denom());
                println!("Address prefix (HRP): {}", builder.hrp());
                println!("Gas price: {}", builder.get_gas_price());
                println!(
                    "Gas multipliers: transfer {}, vote {}",
                    builder.get_transfer_gas_multiplier(),
                    builder.get_vote_gas_multiplier()
                );
                println!(
                    "Polling: every {:?}, up to {:?}",
                    builder.get_poll_interval(),
                    builder.get_poll_timeout()
                );
            }
            Subcommand::Denom { opt: inner } => denom::go(inner)?,
            Subcommand::Address { opt: inner } => {
                let builder = opt.network_opt.into_builder()?;
                address::go(builder.hrp(), inner)?;
            }
            Subcommand::Tx { opt: inner } => {
                let builder = opt.network_opt.into_builder()?;
                tx::go(builder, inner).await?;
            }
            Subcommand::Config { opt: inner } => config::go(opt, inner)?,
            Subcommand::GenerateShellCompletions { shell } => {
                clap_complete::generate(
                    shell,
                    &mut cli::Cmd::command(),
                    "gonka",
                    &mut std::io::stdout(),
                );
            }
        }

        Ok(())
    }
}

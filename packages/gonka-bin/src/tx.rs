use anyhow::Result;
use gonka::{GonkaBuilder, PollSettings, RestClient, TxReceipt, TxStatusQuery};

#[derive(clap::Parser)]
pub(crate) struct Opt {
    #[clap(subcommand)]
    sub: Subcommand,
}

#[derive(clap::Parser)]
enum Subcommand {
    /// Look up a transaction once
    Show {
        txhash: String,
        /// Pretty-print JSON output?
        #[clap(long)]
        pretty: bool,
    },
    /// Poll until the transaction lands on chain or the poll timeout passes
    Wait {
        txhash: String,
        /// Pretty-print JSON output?
        #[clap(long)]
        pretty: bool,
    },
}

pub(crate) async fn go(builder: GonkaBuilder, Opt { sub }: Opt) -> Result<()> {
    let rest = RestClient::new(&builder)?;
    match sub {
        Subcommand::Show { txhash, pretty } => match rest.get_transaction(&txhash).await? {
            Some(receipt) => print_receipt(&receipt, pretty)?,
            None => anyhow::bail!("Transaction {txhash} not found"),
        },
        Subcommand::Wait { txhash, pretty } => {
            let poll = PollSettings::from_builder(&builder);
            let receipt = gonka::wait_for_transaction(&rest, txhash, poll).await?;
            print_receipt(&receipt, pretty)?;
        }
    }
    Ok(())
}

fn print_receipt(receipt: &TxReceipt, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(receipt)?);
    } else {
        println!("{}", serde_json::to_string(receipt)?);
    }
    if !receipt.is_success() {
        tracing::warn!(
            "Transaction {} failed on chain with code {} in {:?}: {}",
            receipt.txhash,
            receipt.code,
            receipt.codespace,
            receipt.raw_log
        );
    }
    Ok(())
}

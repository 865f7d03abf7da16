use anyhow::Result;
use gonka::{Address, AddressHrp};

#[derive(clap::Parser)]
pub(crate) struct Opt {
    #[clap(subcommand)]
    sub: Subcommand,
}

#[derive(clap::Parser)]
enum Subcommand {
    /// Check that an address uses the network's prefix and is valid bech32
    Check { address: String },
}

pub(crate) fn go(hrp: AddressHrp, Opt { sub }: Opt) -> Result<()> {
    match sub {
        Subcommand::Check { address } => {
            let address = Address::parse_for(&address, hrp)?;
            tracing::debug!("Raw address: {:?}", address.raw());
            println!("{address} is a valid {hrp} address");
        }
    }
    Ok(())
}

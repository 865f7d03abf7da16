use anyhow::Result;
use gonka::NGONKA_DECIMALS;

#[derive(clap::Parser)]
pub(crate) struct Opt {
    #[clap(subcommand)]
    sub: Subcommand,
}

#[derive(clap::Parser)]
enum Subcommand {
    /// Convert a display amount (e.g. 1.5) into base units
    ToBase {
        amount: String,
        /// Number of decimal places between the display and base units
        #[clap(long, default_value_t = NGONKA_DECIMALS)]
        decimals: u32,
    },
    /// Convert a base unit amount into display units
    ToDisplay {
        amount: String,
        /// Number of decimal places between the display and base units
        #[clap(long, default_value_t = NGONKA_DECIMALS)]
        decimals: u32,
    },
}

pub(crate) fn go(Opt { sub }: Opt) -> Result<()> {
    match sub {
        Subcommand::ToBase { amount, decimals } => {
            println!("{}", gonka::to_base_units(&amount, decimals)?)
        }
        Subcommand::ToDisplay { amount, decimals } => {
            println!("{}", gonka::to_display_units(&amount, decimals)?)
        }
    }
    Ok(())
}

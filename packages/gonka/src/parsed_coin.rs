use std::{fmt::Display, str::FromStr};

use crate::{denom, error::ParseCoinError, Coin, DenomError};

/// A base unit amount paired with its denom, parsed from strings like `1500ngonka`.
///
/// The amount is kept as a canonical digit string, so values of any size are
/// represented exactly.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct ParsedCoin {
    denom: String,
    amount: String,
}

impl ParsedCoin {
    /// Build from a base unit amount and denom.
    pub fn new(amount: &str, denom: impl Into<String>) -> Result<Self, DenomError> {
        if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DenomError::InvalidAmountFormat {
                input: amount.to_owned(),
            });
        }
        let amount = denom::to_base_units(amount, 0)?;
        Ok(ParsedCoin {
            denom: denom.into(),
            amount,
        })
    }

    /// Build from a display amount, e.g. `("1.5", "ngonka", 9)` gives `1500000000ngonka`.
    pub fn from_display(
        display: &str,
        denom: impl Into<String>,
        decimals: u32,
    ) -> Result<Self, DenomError> {
        Ok(ParsedCoin {
            denom: denom.into(),
            amount: denom::to_base_units(display, decimals)?,
        })
    }

    /// The base unit amount.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// The denom.
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// Render the amount in display units.
    pub fn to_display(&self, decimals: u32) -> String {
        // The amount is already a validated digit string
        denom::to_display_units(&self.amount, decimals).unwrap_or_else(|_| self.amount.clone())
    }
}

impl From<ParsedCoin> for Coin {
    fn from(ParsedCoin { denom, amount }: ParsedCoin) -> Self {
        Coin { denom, amount }
    }
}

impl Display for ParsedCoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for ParsedCoin {
    type Err = ParseCoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseCoinError {
            input: s.to_owned(),
            reason,
        };
        if s.is_empty() {
            return Err(err("input is empty"));
        }

        let denom_first_index = s
            .char_indices()
            .find(|(_, char)| !char.is_ascii_digit())
            .map(|(index, _)| index);

        match denom_first_index {
            None => Err(err("denom is missing")),
            Some(0) => Err(err("amount is missing")),
            Some(denom_first_index) => {
                let (amount, denom) = s.split_at(denom_first_index);
                if !denom
                    .chars()
                    .all(|char| char.is_ascii_alphanumeric() || char == '/')
                {
                    return Err(err("invalid character in denom"));
                }
                ParsedCoin::new(amount, denom).map_err(|_| err("invalid amount"))
            }
        }
    }
}

//! Gas prices such as `0.025ngonka` and exact fee computation.

use std::{fmt::Display, str::FromStr};

use serde::de::Visitor;

use crate::{denom, error::GasPriceError, Coin};

/// Maximum fractional digits accepted in a gas price amount.
const MAX_FRACTIONAL_DIGITS: u32 = 18;

/// Price paid per unit of gas, in a specific denom.
///
/// The amount is stored as an integer scaled by a power of ten, so fee
/// computation never goes through floating point.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GasPrice {
    amount: String,
    denom: String,
    atomics: u128,
    fractional_digits: u32,
}

impl GasPrice {
    /// The default gas price of `0.025` for the given denom.
    pub fn default_for(denom: impl Into<String>) -> Self {
        GasPrice {
            amount: "0.025".to_owned(),
            denom: denom.into(),
            atomics: 25,
            fractional_digits: 3,
        }
    }

    /// The decimal amount, e.g. `0.025`.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// The denom fees are paid in.
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// Fee for the given gas limit: `ceil(gas_limit * price)`.
    pub fn fee_for(&self, gas_limit: u64) -> Result<Coin, GasPriceError> {
        let overflow = || GasPriceError::FeeOverflow {
            gas_limit,
            gas_price: self.to_string(),
        };
        let product = u128::from(gas_limit)
            .checked_mul(self.atomics)
            .ok_or_else(overflow)?;
        let scale = 10u128
            .checked_pow(self.fractional_digits)
            .ok_or_else(overflow)?;
        Ok(Coin {
            denom: self.denom.clone(),
            amount: product.div_ceil(scale).to_string(),
        })
    }
}

impl Display for GasPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for GasPrice {
    type Err = GasPriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| GasPriceError::InvalidFormat {
            input: s.to_owned(),
            reason,
        };

        let denom_start = s
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| err("denom is missing"))?;
        let (amount, denom) = s.split_at(denom_start);
        if amount.is_empty() || amount == "." {
            return Err(err("amount is missing"));
        }

        let mut chars = denom.chars();
        let first_is_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if !first_is_letter
            || !chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c))
            || !(3..=128).contains(&denom.len())
        {
            return Err(err("invalid denom"));
        }

        let fractional_digits = amount
            .split_once('.')
            .map_or(0, |(_, fractional)| fractional.len());
        let fractional_digits = u32::try_from(fractional_digits)
            .ok()
            .filter(|digits| *digits <= MAX_FRACTIONAL_DIGITS)
            .ok_or_else(|| err("too many fractional digits"))?;
        let atomics = denom::to_base_units(amount, fractional_digits)
            .map_err(|_| err("invalid amount"))?
            .parse::<u128>()
            .map_err(|_| err("amount out of range"))?;

        Ok(GasPrice {
            amount: amount.to_owned(),
            denom: denom.to_owned(),
            atomics,
            fractional_digits,
        })
    }
}

impl serde::Serialize for GasPrice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for GasPrice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(GasPriceVisitor)
    }
}

struct GasPriceVisitor;

impl Visitor<'_> for GasPriceVisitor {
    type Value = GasPrice;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("gas price, e.g. 0.025ngonka")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

//! Exact conversion between base units (`ngonka`) and display units (`gonka`).
//!
//! Amounts are handled as decimal digit strings throughout, so arbitrarily
//! large values convert without any loss of precision.

use crate::error::DenomError;

/// Number of decimal places between `ngonka` and `gonka`.
pub const NGONKA_DECIMALS: u32 = 9;

/// Convert a display amount such as `"12.345"` into base units.
///
/// Fractional digits beyond `decimals` are truncated, not rounded. An empty
/// string is treated as zero.
pub fn to_base_units(display: &str, decimals: u32) -> Result<String, DenomError> {
    let (integer, fractional) = display.split_once('.').unwrap_or((display, ""));
    if !is_digits(integer) || !is_digits(fractional) {
        return Err(DenomError::InvalidAmountFormat {
            input: display.to_owned(),
        });
    }

    let decimals = decimals as usize;
    let mut base = String::with_capacity(integer.len() + decimals);
    base.push_str(integer);
    base.extend(
        fractional
            .chars()
            .chain(std::iter::repeat('0'))
            .take(decimals),
    );
    Ok(strip_leading_zeros(&base).to_owned())
}

/// Convert a base unit amount into its canonical display form.
///
/// The result has no leading zeros in the integer part, no trailing zeros in
/// the fractional part, and no decimal point when the fraction is zero.
pub fn to_display_units(base: &str, decimals: u32) -> Result<String, DenomError> {
    if !is_digits(base) {
        return Err(DenomError::InvalidAmountFormat {
            input: base.to_owned(),
        });
    }

    let decimals = decimals as usize;
    let value = strip_leading_zeros(base);
    let padded;
    let value = if value.len() <= decimals {
        padded = format!("{value:0>width$}", width = decimals + 1);
        padded.as_str()
    } else {
        value
    };

    let (integer, fractional) = value.split_at(value.len() - decimals);
    let fractional = fractional.trim_end_matches('0');
    Ok(if fractional.is_empty() {
        integer.to_owned()
    } else {
        format!("{integer}.{fractional}")
    })
}

/// [to_base_units] with [NGONKA_DECIMALS].
pub fn to_ngonka(display: &str) -> Result<String, DenomError> {
    to_base_units(display, NGONKA_DECIMALS)
}

/// [to_display_units] with [NGONKA_DECIMALS].
pub fn from_ngonka(base: &str) -> Result<String, DenomError> {
    to_display_units(base, NGONKA_DECIMALS)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn strip_leading_zeros(s: &str) -> &str {
    match s.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::Arbitrary;

    use super::*;

    #[derive(Clone, Debug)]
    struct BaseAmount(String);

    impl Arbitrary for BaseAmount {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let len = usize::arbitrary(g) % 40 + 1;
            BaseAmount(
                (0..len)
                    .map(|_| char::from(b'0' + u8::arbitrary(g) % 10))
                    .collect(),
            )
        }
    }

    #[derive(Clone, Copy, Debug)]
    struct Decimals(u32);

    impl Arbitrary for Decimals {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            Decimals(u32::arbitrary(g) % 19)
        }
    }

    quickcheck::quickcheck! {
        fn roundtrip_base(amount: BaseAmount, decimals: Decimals) -> bool {
            let display = to_display_units(&amount.0, decimals.0).unwrap();
            let base = to_base_units(&display, decimals.0).unwrap();
            base == strip_leading_zeros(&amount.0)
        }

        fn display_is_canonical(amount: BaseAmount, decimals: Decimals) -> bool {
            let display = to_display_units(&amount.0, decimals.0).unwrap();
            let integer = display.split('.').next().unwrap();
            let no_leading = integer == "0" || !integer.starts_with('0');
            let no_trailing = !display.contains('.') || !display.ends_with('0');
            no_leading && no_trailing
        }
    }

    #[test]
    fn truncates_excess_precision() {
        assert_eq!(to_base_units("1.23456", 2).unwrap(), "123");
        assert_eq!(to_base_units("0.0000000019", 9).unwrap(), "1");
    }

    #[test]
    fn zero_handling() {
        assert_eq!(to_display_units("0", 9).unwrap(), "0");
        assert_eq!(to_display_units("", 9).unwrap(), "0");
        assert_eq!(to_display_units("000", 9).unwrap(), "0");
        assert_eq!(to_base_units("0", 9).unwrap(), "0");
        assert_eq!(to_base_units("", 9).unwrap(), "0");
        assert_eq!(to_base_units("0.000", 9).unwrap(), "0");
    }

    #[test]
    fn boundaries() {
        assert_eq!(to_display_units("1", 9).unwrap(), "0.000000001");
        assert_eq!(to_display_units("1000000000", 9).unwrap(), "1");
        assert_eq!(to_display_units("1500000000", 9).unwrap(), "1.5");
        assert_eq!(to_display_units("12345000000", 9).unwrap(), "12.345");
        assert_eq!(to_base_units("12.345", 9).unwrap(), "12345000000");
        assert_eq!(to_base_units(".5", 9).unwrap(), "500000000");
        assert_eq!(to_base_units("7.", 9).unwrap(), "7000000000");
    }

    #[test]
    fn zero_decimals() {
        assert_eq!(to_display_units("00123", 0).unwrap(), "123");
        assert_eq!(to_base_units("123.99", 0).unwrap(), "123");
    }

    #[test]
    fn large_values_are_exact() {
        let base = "123456789012345678901234567890123456789";
        let display = from_ngonka(base).unwrap();
        assert_eq!(display, "123456789012345678901234567890.123456789");
        assert_eq!(to_ngonka(&display).unwrap(), base);
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["abc", "-1", "1.2.3", "1,5", " 1", "1e9"] {
            assert_eq!(
                to_base_units(input, 9),
                Err(DenomError::InvalidAmountFormat {
                    input: input.to_owned()
                })
            );
        }
        for input in ["1.5", "-1", "12a"] {
            to_display_units(input, 9).unwrap_err();
        }
    }
}

//! Bech32 addresses and the chain prefix precondition check.

use std::{
    collections::HashSet,
    fmt::{Debug, Display},
    str::FromStr,
    sync::OnceLock,
};

use bech32::{Bech32, Hrp};
use parking_lot::RwLock;
use serde::de::Visitor;

use crate::error::AddressError;

/// Bech32 human-readable part used by Gonka accounts.
pub const GONKA_HRP: &str = "gonka";

/// Check that `address` belongs to the Gonka chain.
///
/// This is a pure precondition check: it only looks at the `gonka1` prefix and
/// never touches the network. Use [Address::from_str] for full bech32
/// validation.
pub fn assert_prefix(address: &str) -> Result<(), AddressError> {
    AddressHrp::gonka().assert_prefix(address)
}

/// The raw bytes of an address, without any chain prefix.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Ord, PartialOrd)]
pub struct RawAddress(RawAddressInner);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Ord, PartialOrd)]
enum RawAddressInner {
    Twenty { raw_address: [u8; 20] },
    ThirtyTwo { raw_address: [u8; 32] },
}

impl RawAddress {
    /// Parse a bech32 address into its HRP and [RawAddress].
    pub fn parse_with_hrp(s: &str) -> Result<(Hrp, RawAddress), AddressError> {
        let (hrp, data) = bech32::decode(s).map_err(|source| AddressError::InvalidBech32 {
            address: s.to_owned(),
            source,
        })?;

        let inner = match <[u8; 20]>::try_from(data.as_slice()) {
            Ok(raw_address) => RawAddressInner::Twenty { raw_address },
            Err(_) => <[u8; 32]>::try_from(data.as_slice())
                .map(|raw_address| RawAddressInner::ThirtyTwo { raw_address })
                .map_err(|_| AddressError::InvalidByteCount {
                    address: s.to_owned(),
                    actual: data.len(),
                })?,
        };

        Ok((hrp, RawAddress(inner)))
    }

    /// Attach a chain prefix, producing an [Address].
    pub fn with_hrp(self, hrp: AddressHrp) -> Address {
        Address {
            raw_address: self,
            hrp,
        }
    }
}

impl AsRef<[u8]> for RawAddress {
    fn as_ref(&self) -> &[u8] {
        match &self.0 {
            RawAddressInner::Twenty { raw_address } => raw_address,
            RawAddressInner::ThirtyTwo { raw_address } => raw_address,
        }
    }
}

impl From<[u8; 20]> for RawAddress {
    fn from(raw_address: [u8; 20]) -> Self {
        RawAddress(RawAddressInner::Twenty { raw_address })
    }
}

impl From<[u8; 32]> for RawAddress {
    fn from(raw_address: [u8; 32]) -> Self {
        RawAddress(RawAddressInner::ThirtyTwo { raw_address })
    }
}

/// A fully decoded bech32 account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    raw_address: RawAddress,
    hrp: AddressHrp,
}

impl Address {
    /// Get the raw bytes without the chain's HRP.
    pub fn raw(self) -> RawAddress {
        self.raw_address
    }

    /// Get the HRP for this address.
    pub fn hrp(self) -> AddressHrp {
        self.hrp
    }

    /// Parse an address and require it to carry the given HRP.
    pub fn parse_for(s: &str, expected: AddressHrp) -> Result<Self, AddressError> {
        expected.assert_prefix(s)?;
        s.parse()
    }
}

impl Display for Address {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let hrp = Hrp::parse(self.hrp.as_str()).map_err(|_| std::fmt::Error)?;
        bech32::encode_to_fmt::<Bech32, _>(fmt, hrp, self.raw_address.as_ref())
            .map_err(|_| std::fmt::Error)
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, raw_address) = RawAddress::parse_with_hrp(s)?;
        Ok(raw_address.with_hrp(AddressHrp::from_hrp(hrp)))
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(AddressVisitor)
    }
}

struct AddressVisitor;

impl Visitor<'_> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("bech32 address")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

/// The human-readable part (HRP) of a bech32 address, such as `gonka`.
///
/// Values are interned for the life of the process, which keeps both this
/// type and [Address] [Copy].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize)]
pub struct AddressHrp(&'static str);

type AddressHrpSet = RwLock<HashSet<&'static str>>;
static ADDRESS_HRPS: OnceLock<AddressHrpSet> = OnceLock::new();

fn intern(s: &str, leak: impl FnOnce() -> &'static str) -> &'static str {
    let set = ADDRESS_HRPS.get_or_init(|| RwLock::new(HashSet::new()));
    if let Some(s) = set.read().get(s) {
        return *s;
    }
    let mut guard = set.write();
    // Another thread may have inserted between the read and write locks
    if let Some(s) = guard.get(s) {
        return *s;
    }
    let s = leak();
    guard.insert(s);
    s
}

impl AddressHrp {
    /// Validate and intern an HRP.
    pub fn new(s: impl AsRef<str>) -> Result<Self, AddressError> {
        let s = s.as_ref();
        if Hrp::parse(s).is_err() {
            return Err(AddressError::InvalidHrp { hrp: s.to_owned() });
        }
        Ok(AddressHrp(intern(s, || &*Box::leak(s.to_owned().into_boxed_str()))))
    }

    /// Intern a static string without validating it.
    pub fn from_static(s: &'static str) -> Self {
        AddressHrp(intern(s, || s))
    }

    /// The `gonka` prefix.
    pub fn gonka() -> Self {
        Self::from_static(GONKA_HRP)
    }

    fn from_hrp(hrp: Hrp) -> Self {
        let s = hrp.to_lowercase();
        AddressHrp(intern(&s, || &*Box::leak(s.clone().into_boxed_str())))
    }

    /// Get the raw string HRP
    pub fn as_str(self) -> &'static str {
        self.0
    }

    /// Require `address` to start with this HRP followed by the bech32 separator.
    pub fn assert_prefix(self, address: &str) -> Result<(), AddressError> {
        match address.strip_prefix(self.0) {
            Some(rest) if rest.starts_with('1') => Ok(()),
            _ => Err(AddressError::InvalidAddressPrefix {
                address: address.to_owned(),
                hrp: self,
            }),
        }
    }
}

impl Display for AddressHrp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for AddressHrp {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressHrp::new(s)
    }
}

impl<'de> serde::Deserialize<'de> for AddressHrp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(AddressHrpVisitor)
    }
}

struct AddressHrpVisitor;

impl Visitor<'_> for AddressHrpVisitor {
    type Value = AddressHrp;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("bech32 HRP")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse::<AddressHrp>().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::Arbitrary;

    use super::*;

    impl Arbitrary for AddressHrp {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            AddressHrp::from_static(g.choose(&["gonka", "cosmos", "osmo"]).unwrap())
        }
    }

    impl Arbitrary for RawAddress {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            if bool::arbitrary(g) {
                let mut raw_address = [0; 20];
                raw_address.iter_mut().for_each(|b| *b = u8::arbitrary(g));
                raw_address.into()
            } else {
                let mut raw_address = [0; 32];
                raw_address.iter_mut().for_each(|b| *b = u8::arbitrary(g));
                raw_address.into()
            }
        }
    }

    quickcheck::quickcheck! {
        fn roundtrip_address(hrp: AddressHrp, raw_address: RawAddress) -> bool {
            let address1 = raw_address.with_hrp(hrp);
            let address2: Address = address1.to_string().parse().unwrap();
            address1 == address2
        }
    }

    #[test]
    fn gonka_prefix_accepted() {
        assert_prefix("gonka1abc").unwrap();
        let address = RawAddress::from([7; 20]).with_hrp(AddressHrp::gonka());
        assert_prefix(&address.to_string()).unwrap();
    }

    #[test]
    fn foreign_prefix_rejected() {
        let err = assert_prefix("cosmos1abc").unwrap_err();
        assert!(matches!(
            err,
            AddressError::InvalidAddressPrefix { ref address, hrp }
                if address == "cosmos1abc" && hrp == AddressHrp::gonka()
        ));
        assert_eq!(
            err.to_string(),
            "Invalid address prefix: expected gonka1... got cosmos1abc"
        );
    }

    #[test]
    fn prefix_requires_separator() {
        assert_prefix("gonka").unwrap_err();
        assert_prefix("gonkax1abc").unwrap_err();
        assert_prefix("").unwrap_err();
    }

    #[test]
    fn parse_for_checks_hrp() {
        let osmo = RawAddress::from([1; 32]).with_hrp(AddressHrp::from_static("osmo"));
        Address::parse_for(&osmo.to_string(), AddressHrp::gonka()).unwrap_err();
        let gonka = osmo.raw().with_hrp(AddressHrp::gonka());
        assert_eq!(
            Address::parse_for(&gonka.to_string(), AddressHrp::gonka()).unwrap(),
            gonka
        );
    }

    #[test]
    fn invalid_byte_count() {
        let hrp = Hrp::parse("gonka").unwrap();
        let encoded = bech32::encode::<Bech32>(hrp, &[1, 2, 3]).unwrap();
        assert!(matches!(
            encoded.parse::<Address>(),
            Err(AddressError::InvalidByteCount { actual: 3, .. })
        ));
    }

    #[test]
    fn hrp_validation() {
        AddressHrp::new("gonka").unwrap();
        AddressHrp::new("gonka with space").unwrap_err();
        assert_eq!(AddressHrp::new("gonka").unwrap(), AddressHrp::gonka());
    }
}

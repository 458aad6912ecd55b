//! Location identifiers accepted by the service, and their grammars.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::OnceLock};

use crate::error::{Error, Result};

/// The grammar family a location string must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationType {
    /// "New York", "New York, NY", "London, United Kingdom".
    City,
    /// XXX.XXX.XXX.XXX
    IpAddress,
    UkPostalCode,
    CanadaPostalCode,
    UsZipcode,
    /// "48.834,2.394"
    LatAndLong,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::City => "city",
            LocationType::IpAddress => "ip-address",
            LocationType::UkPostalCode => "uk-postal-code",
            LocationType::CanadaPostalCode => "canada-postal-code",
            LocationType::UsZipcode => "us-zipcode",
            LocationType::LatAndLong => "lat-and-long",
        }
    }

    pub const fn all() -> &'static [LocationType] {
        &[
            LocationType::City,
            LocationType::IpAddress,
            LocationType::UkPostalCode,
            LocationType::CanadaPostalCode,
            LocationType::UsZipcode,
            LocationType::LatAndLong,
        ]
    }

    fn pattern(&self) -> &'static Regex {
        static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            LocationType::all()
                .iter()
                .map(|t| Regex::new(t.grammar()).expect("location grammar must compile"))
                .collect()
        });
        &patterns[*self as usize]
    }

    fn grammar(&self) -> &'static str {
        match self {
            LocationType::City => r"^[a-zA-Z0-9, ]+$",
            LocationType::IpAddress => {
                r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$"
            }
            LocationType::UkPostalCode => r"^[A-Z]{1,2}[0-9R][0-9A-Z]? ?[0-9][A-Z--[CIKMOV]]{2}$",
            LocationType::CanadaPostalCode => {
                r"^[ABCEFGHJKLMNPRSTVXY][0-9][ABCEFGHJKLMNPRSTVWXYZ] ?[0-9][ABCEFGHJKLMNPRSTVWXYZ][0-9]$"
            }
            LocationType::UsZipcode => r"^[0-9]{5}(?:-[0-9]{4})?$",
            LocationType::LatAndLong => {
                r"^[-+]?(?:[1-8]?[0-9](?:\.[0-9]{3})?|90(?:\.0+)?),[ \t\n\r\x0C\x08]*[-+]?(?:180(?:\.0+)?|(?:1[0-7][0-9]|[1-9]?[0-9])(?:\.[0-9]{3})?)$"
            }
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            LocationType::City => "only letters, numbers, comma and space are allowed",
            LocationType::IpAddress => "expected XXX.XXX.XXX.XXX with every XXX between 0 and 255",
            LocationType::UkPostalCode => "not a UK postal code",
            LocationType::CanadaPostalCode => "not a Canadian postal code",
            LocationType::UsZipcode => "expected 12345 or 12345-6789",
            LocationType::LatAndLong => {
                "expected 'lat,long' with lat in [-90,90] and long in [-180,180]"
            }
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let lower = value.to_lowercase();
        LocationType::all()
            .iter()
            .find(|t| t.as_str() == lower)
            .copied()
            .ok_or_else(|| Error::UnknownCode {
                kind: "location type",
                value: value.to_string(),
            })
    }
}

/// Checks `location` against the grammar of `location_type`.
pub fn validate(location_type: LocationType, location: &str) -> Result<()> {
    if location_type.pattern().is_match(location) {
        Ok(())
    } else {
        Err(Error::InvalidLocation {
            location_type,
            location: location.to_string(),
            hint: location_type.hint(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn check(location_type: LocationType, valid: &[&str], invalid: &[&str]) {
        for v in valid {
            assert!(
                validate(location_type, v).is_ok(),
                "{location_type}: expected '{v}' to be accepted"
            );
        }
        for v in invalid {
            assert!(
                validate(location_type, v).is_err(),
                "{location_type}: expected '{v}' to be rejected"
            );
        }
    }

    #[test]
    fn city() {
        check(
            LocationType::City,
            &["London", "New York, NY", "London, United Kingdom", "Area 51"],
            &["", "São Paulo", "Paris;drop", "Saint-Denis"],
        );
    }

    #[test]
    fn ip_address() {
        check(
            LocationType::IpAddress,
            &["195.56.119.209", "0.0.0.0", "255.255.255.255", "10.01.1.1"],
            &["256.1.1.1", "1.2.3", "1.2.3.4.5", "1.2.3.x", "1-2-3-4", " 1.2.3.4"],
        );
    }

    #[test]
    fn uk_postal_code() {
        check(
            LocationType::UkPostalCode,
            &["SW1A 1AA", "SW1A1AA", "M1 1AE", "B33 8TH", "CR2 6XH", "DN55 1PT"],
            &["SW1", "sw1a 1aa", "SW1A 1AC", "SW1A 1IA", "EC1A 1BV", "12345"],
        );
    }

    #[test]
    fn canada_postal_code() {
        check(
            LocationType::CanadaPostalCode,
            &["K1A 0B1", "K1A0B1", "H0H 0H0", "T2X 1V4"],
            &["D1A 0B1", "K1D 0B1", "k1a 0b1", "K1A-0B1", "W1A 0B1"],
        );
    }

    #[test]
    fn us_zipcode() {
        check(
            LocationType::UsZipcode,
            &["90201", "90201-1234"],
            &["9020", "902011", "90201-123", "90201 1234", "abcde"],
        );
    }

    #[test]
    fn lat_and_long() {
        check(
            LocationType::LatAndLong,
            &[
                "48.834,2.394",
                "48.834, 2.394",
                "-90,180",
                "+90.0,-180.0",
                "0,0",
                "-33.867,151.207",
                "51,\t-1",
                "51,\r\n-1",
                "51,\u{c}-1",
            ],
            &[
                "91,0",
                "0,181",
                "48.8345,2.394",
                "48.8,2.394",
                "48.834;2.394",
                "48x834,2.394",
                "48.834,\u{2003}2.394",
                "48.834,\u{3000}2.394",
                "48.834,\u{2003}\u{3000}2.394",
                "48.834,\u{b}2.394",
                "48.834,\u{a0}2.394",
            ],
        );
    }

    #[test]
    fn error_carries_type_and_value() {
        let err = validate(LocationType::IpAddress, "256.1.1.1").unwrap_err();
        match err {
            Error::InvalidLocation {
                location_type,
                location,
                ..
            } => {
                assert_eq!(location_type, LocationType::IpAddress);
                assert_eq!(location, "256.1.1.1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn location_type_name_roundtrip() {
        for t in LocationType::all() {
            assert_eq!(t.as_str().parse::<LocationType>().unwrap(), *t);
        }
        assert!("postcode".parse::<LocationType>().is_err());
    }

    proptest! {
        #[test]
        fn any_octets_in_range_are_valid_ips(a in 0u16..=255, b in 0u16..=255, c in 0u16..=255, d in 0u16..=255) {
            let ip = format!("{a}.{b}.{c}.{d}");
            prop_assert!(validate(LocationType::IpAddress, &ip).is_ok());
        }

        #[test]
        fn an_octet_above_255_is_rejected(a in 256u16..=999, b in 0u16..=255) {
            let ip = format!("{b}.{a}.{b}.{b}");
            prop_assert!(validate(LocationType::IpAddress, &ip).is_err());
        }

        #[test]
        fn whole_degree_coordinates_in_range_are_valid(lat in -90i32..=90, long in -180i32..=180) {
            let value = format!("{lat},{long}");
            prop_assert!(validate(LocationType::LatAndLong, &value).is_ok());
        }
    }
}

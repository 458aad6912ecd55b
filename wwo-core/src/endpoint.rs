//! Per-family configuration tables.
//!
//! The five endpoint families differ only in data: their paths, the name of
//! the location parameter, which options they accept and the bounds of their
//! count option. [`EndpointConfig`] holds that data and a single builder
//! ([`crate::WeatherRequest`]) interprets it.

use serde::{Deserialize, Serialize};
use std::{fmt, ops::RangeInclusive, str::FromStr};

use crate::{
    error::Error,
    location::LocationType,
    options::{Extra, Format, PackageType},
};

/// Host shared by every endpoint family.
pub const HOST: &str = "api.worldweatheronline.com";

/// Query parameter names.
pub mod param {
    pub const KEY: &str = "key";
    pub const Q: &str = "q";
    pub const QUERY: &str = "query";
    pub const DATE: &str = "date";
    pub const END_DATE: &str = "enddate";
    pub const NUM_OF_RESULTS: &str = "num_of_results";
    pub const NUM_OF_DAYS: &str = "num_of_days";
    pub const EXTRA: &str = "extra";
    pub const INTERVAL: &str = "tp";
    pub const FORMAT: &str = "format";
    pub const CALLBACK: &str = "callback";
    pub const LANGUAGE: &str = "lang";
    pub const CATEGORY: &str = "wct";
    pub const INCLUDE_LOCATION: &str = "includeLocation";
    pub const TIMEZONE: &str = "timezone";
    pub const POPULAR: &str = "popular";
    pub const FORECAST: &str = "fx";
    pub const TIDE: &str = "tide";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    /// Location search.
    Search,
    /// Past weather, from 1 July 2008 onwards (premium).
    Historical,
    Marine,
    Ski,
    TimeZone,
}

/// Numeric option whose valid range depends on the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountOption {
    pub parameter: &'static str,
    pub free: RangeInclusive<u32>,
    pub premium: RangeInclusive<u32>,
}

impl CountOption {
    pub fn bounds(&self, package: PackageType) -> &RangeInclusive<u32> {
        match package {
            PackageType::Free => &self.free,
            PackageType::Premium => &self.premium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub endpoint: Endpoint,
    pub free_path: &'static str,
    pub premium_path: &'static str,
    /// Name under which the location is sent.
    pub location_parameter: &'static str,
    /// `None` accepts every location type.
    pub location_types: Option<&'static [LocationType]>,
    pub count: Option<CountOption>,
    pub formats: &'static [Format],
    pub extras: &'static [Extra],
    /// Optional parameters beyond `format` and `extra`.
    pub parameters: &'static [&'static str],
    /// Mandatory arguments that the generic constructor cannot supply.
    pub required: &'static [&'static str],
}

impl EndpointConfig {
    pub fn base_path(&self, package: PackageType) -> &'static str {
        match package {
            PackageType::Free => self.free_path,
            PackageType::Premium => self.premium_path,
        }
    }

    pub fn accepts_location(&self, location_type: LocationType) -> bool {
        self.location_types
            .is_none_or(|types| types.contains(&location_type))
    }

    pub fn supports(&self, parameter: &str) -> bool {
        match parameter {
            param::FORMAT => !self.formats.is_empty(),
            param::EXTRA => !self.extras.is_empty(),
            p => {
                self.parameters.contains(&p)
                    || self.count.as_ref().is_some_and(|c| c.parameter == p)
            }
        }
    }
}

static SEARCH: EndpointConfig = EndpointConfig {
    endpoint: Endpoint::Search,
    free_path: "/free/v2/search.ashx",
    premium_path: "/premium/v1/search.ashx",
    location_parameter: param::QUERY,
    location_types: None,
    count: Some(CountOption {
        parameter: param::NUM_OF_RESULTS,
        free: 1..=3,
        premium: 1..=50,
    }),
    formats: &[Format::Xml, Format::Json, Format::Tab],
    extras: &[Extra::IsDayTime, Extra::UtcDateTime, Extra::LocalObsTime],
    parameters: &[param::TIMEZONE, param::POPULAR, param::CATEGORY],
    required: &[],
};

static HISTORICAL: EndpointConfig = EndpointConfig {
    endpoint: Endpoint::Historical,
    free_path: "/free/v2/past-weather.ashx",
    premium_path: "/premium/v1/past-weather.ashx",
    location_parameter: param::Q,
    location_types: None,
    count: None,
    formats: &[Format::Xml, Format::Json, Format::Csv, Format::Tab],
    extras: &[Extra::IsDayTime, Extra::UtcDateTime],
    parameters: &[
        param::END_DATE,
        param::INCLUDE_LOCATION,
        param::INTERVAL,
        param::CALLBACK,
    ],
    required: &[param::DATE],
};

static MARINE: EndpointConfig = EndpointConfig {
    endpoint: Endpoint::Marine,
    free_path: "/free/v2/marine.ashx",
    premium_path: "/premium/v1/marine.ashx",
    location_parameter: param::Q,
    location_types: Some(&[LocationType::LatAndLong]),
    count: None,
    formats: &[Format::Xml, Format::Json],
    extras: &[],
    parameters: &[
        param::FORECAST,
        param::INTERVAL,
        param::TIDE,
        param::LANGUAGE,
        param::CALLBACK,
    ],
    required: &[],
};

static SKI: EndpointConfig = EndpointConfig {
    endpoint: Endpoint::Ski,
    free_path: "/free/v2/ski.ashx",
    premium_path: "/premium/v1/ski.ashx",
    location_parameter: param::Q,
    location_types: None,
    count: Some(CountOption {
        parameter: param::NUM_OF_DAYS,
        free: 1..=u32::MAX,
        premium: 1..=u32::MAX,
    }),
    formats: &[Format::Xml, Format::Json],
    extras: &[Extra::IsDayTime],
    parameters: &[
        param::DATE,
        param::INCLUDE_LOCATION,
        param::INTERVAL,
        param::LANGUAGE,
        param::CALLBACK,
    ],
    required: &[param::NUM_OF_DAYS],
};

static TIME_ZONE: EndpointConfig = EndpointConfig {
    endpoint: Endpoint::TimeZone,
    free_path: "/free/v2/tz.ashx",
    premium_path: "/premium/v1/tz.ashx",
    location_parameter: param::Q,
    location_types: None,
    count: None,
    formats: &[Format::Xml, Format::Json],
    extras: &[],
    parameters: &[param::CALLBACK],
    required: &[],
};

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::Historical => "historical",
            Endpoint::Marine => "marine",
            Endpoint::Ski => "ski",
            Endpoint::TimeZone => "time-zone",
        }
    }

    pub const fn all() -> &'static [Endpoint] {
        &[
            Endpoint::Search,
            Endpoint::Historical,
            Endpoint::Marine,
            Endpoint::Ski,
            Endpoint::TimeZone,
        ]
    }

    pub fn config(&self) -> &'static EndpointConfig {
        match self {
            Endpoint::Search => &SEARCH,
            Endpoint::Historical => &HISTORICAL,
            Endpoint::Marine => &MARINE,
            Endpoint::Ski => &SKI,
            Endpoint::TimeZone => &TIME_ZONE,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.to_lowercase();
        Endpoint::all()
            .iter()
            .find(|e| e.as_str() == lower)
            .copied()
            .ok_or_else(|| Error::UnknownCode {
                kind: "endpoint",
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_belongs_to_its_endpoint() {
        for endpoint in Endpoint::all() {
            assert_eq!(endpoint.config().endpoint, *endpoint);
        }
    }

    #[test]
    fn base_paths_follow_package_and_version() {
        for endpoint in Endpoint::all() {
            let cfg = endpoint.config();
            assert!(cfg.base_path(PackageType::Free).starts_with("/free/v2/"));
            assert!(cfg.base_path(PackageType::Premium).starts_with("/premium/v1/"));
            assert!(cfg.base_path(PackageType::Free).ends_with(".ashx"));
        }
        assert_eq!(
            Endpoint::Historical.config().base_path(PackageType::Premium),
            "/premium/v1/past-weather.ashx"
        );
        assert_eq!(
            Endpoint::TimeZone.config().base_path(PackageType::Free),
            "/free/v2/tz.ashx"
        );
    }

    #[test]
    fn search_uses_query_and_others_use_q() {
        for endpoint in Endpoint::all() {
            let expected = if *endpoint == Endpoint::Search {
                param::QUERY
            } else {
                param::Q
            };
            assert_eq!(endpoint.config().location_parameter, expected);
        }
    }

    #[test]
    fn search_count_bounds_depend_on_package() {
        let count = Endpoint::Search.config().count.as_ref().unwrap();
        assert_eq!(count.bounds(PackageType::Free), &(1..=3));
        assert_eq!(count.bounds(PackageType::Premium), &(1..=50));
    }

    #[test]
    fn marine_only_accepts_coordinates() {
        let cfg = Endpoint::Marine.config();
        assert!(cfg.accepts_location(LocationType::LatAndLong));
        assert!(!cfg.accepts_location(LocationType::City));
        assert!(Endpoint::Ski.config().accepts_location(LocationType::City));
    }

    #[test]
    fn supports_reflects_table() {
        let tz = Endpoint::TimeZone.config();
        assert!(tz.supports(param::CALLBACK));
        assert!(tz.supports(param::FORMAT));
        assert!(!tz.supports(param::EXTRA));
        assert!(!tz.supports(param::LANGUAGE));

        let search = Endpoint::Search.config();
        assert!(search.supports(param::NUM_OF_RESULTS));
        assert!(!search.supports(param::CALLBACK));
    }

    #[test]
    fn endpoint_name_roundtrip() {
        for endpoint in Endpoint::all() {
            assert_eq!(endpoint.as_str().parse::<Endpoint>().unwrap(), *endpoint);
        }
    }
}

//! Core library for the World Weather Online request client.
//!
//! This crate defines:
//! - Location grammars and their validation
//! - Per-endpoint configuration tables (search, historical, marine, ski, time zone)
//! - A validating request builder and the parameters it accumulates
//! - Dispatch of a finished request as a single GET, returning the raw body
//! - Configuration & credentials handling
//!
//! Response bodies are returned unread; parsing them is left to the caller.

pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod location;
pub mod options;
pub mod params;
pub mod request;

pub use config::Config;
pub use dispatch::{Dispatcher, HttpTransport, RequestSpec, ResponseBody, Transport};
pub use endpoint::{Endpoint, EndpointConfig};
pub use error::{Error, Result};
pub use location::{LocationType, validate};
pub use options::{Category, Extra, Format, Interval, Language, PackageType, Scheme};
pub use params::{ExtraSet, ParameterSet};
pub use request::WeatherRequest;

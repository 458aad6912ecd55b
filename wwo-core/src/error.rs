use std::path::PathBuf;

use chrono::NaiveDate;

use crate::{endpoint::Endpoint, location::LocationType, options::PackageType};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building or sending a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {location_type} location '{location}': {hint}")]
    InvalidLocation {
        location_type: LocationType,
        location: String,
        hint: &'static str,
    },

    #[error("the {endpoint} endpoint does not accept {location_type} locations")]
    LocationTypeNotAccepted {
        endpoint: Endpoint,
        location_type: LocationType,
    },

    #[error("{parameter} must be between {min} and {max} in the {package} API, got {value}")]
    OutOfRange {
        parameter: &'static str,
        package: PackageType,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("the end date {end} is before the start date {start}")]
    EndDateBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("the end date {end} must have the same month as the start date {start}")]
    EndDateMonthMismatch { start: NaiveDate, end: NaiveDate },

    #[error("the end date {end} must have the same year as the start date {start}")]
    EndDateYearMismatch { start: NaiveDate, end: NaiveDate },

    #[error("stored start date '{value}' is not a valid YYYY-MM-DD date")]
    InvalidStoredDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("the {endpoint} endpoint does not support {parameter}")]
    Unsupported {
        endpoint: Endpoint,
        parameter: String,
    },

    #[error("the {endpoint} endpoint requires {argument}")]
    MissingArgument {
        endpoint: Endpoint,
        argument: &'static str,
    },

    #[error("unknown {kind} '{value}'")]
    UnknownCode { kind: &'static str, value: String },

    #[error("failed to assemble request URI")]
    InvalidUri(#[from] url::ParseError),

    #[error("HTTP transport failure")]
    Transport(#[from] reqwest::Error),

    #[error("configuration error ({}): {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// True for errors caused by caller input rather than the URI or transport.
    ///
    /// Validation failures leave the parameter set untouched and can be fixed
    /// by calling the setter again with corrected input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidLocation { .. }
                | Error::LocationTypeNotAccepted { .. }
                | Error::OutOfRange { .. }
                | Error::EndDateBeforeStart { .. }
                | Error::EndDateMonthMismatch { .. }
                | Error::EndDateYearMismatch { .. }
                | Error::InvalidStoredDate { .. }
                | Error::Unsupported { .. }
                | Error::MissingArgument { .. }
                | Error::UnknownCode { .. }
        )
    }
}

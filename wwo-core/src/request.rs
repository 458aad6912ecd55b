//! The request builder shared by all endpoint families.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::{
    dispatch::RequestSpec,
    endpoint::{Endpoint, EndpointConfig, HOST, param},
    error::{Error, Result},
    location::{self, LocationType},
    options::{Category, Extra, Format, Interval, Language, PackageType, Scheme},
    params::ParameterSet,
};

/// Date layout used for `date` and `enddate`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builder for one request against one endpoint family.
///
/// Construction validates the location and every mandatory argument, so a
/// `WeatherRequest` only exists in a valid state. Setters validate their
/// input against the current state and either apply fully or leave the
/// parameters untouched.
///
/// ```no_run
/// use wwo_core::{Dispatcher, Format, LocationType, PackageType, Scheme, WeatherRequest};
///
/// let mut search = WeatherRequest::search(
///     PackageType::Free,
///     "api-key",
///     LocationType::IpAddress,
///     "195.56.119.209",
/// )?;
/// search.format(Format::Json)?.num_of_results(3)?;
///
/// let body = Dispatcher::new()?.send(&search.to_request_spec(Scheme::Https))?;
/// # drop(body);
/// # Ok::<(), wwo_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    config: &'static EndpointConfig,
    package: PackageType,
    params: ParameterSet,
}

impl WeatherRequest {
    /// Generic constructor for families whose only mandatory input is the
    /// location. Historical and ski requests need their own constructors.
    pub fn new(
        endpoint: Endpoint,
        package: PackageType,
        key: &str,
        location_type: LocationType,
        location: &str,
    ) -> Result<Self> {
        let config = endpoint.config();
        if let Some(&argument) = config.required.first() {
            return Err(Error::MissingArgument { endpoint, argument });
        }
        Self::seeded(config, package, key, location_type, location)
    }

    pub fn search(
        package: PackageType,
        key: &str,
        location_type: LocationType,
        location: &str,
    ) -> Result<Self> {
        Self::new(Endpoint::Search, package, key, location_type, location)
    }

    /// Past weather for `date`. An end date in the same month can be added
    /// with [`WeatherRequest::end_date`].
    pub fn historical(
        package: PackageType,
        key: &str,
        location_type: LocationType,
        location: &str,
        date: NaiveDate,
    ) -> Result<Self> {
        let mut request = Self::seeded(
            Endpoint::Historical.config(),
            package,
            key,
            location_type,
            location,
        )?;
        request.params.set(param::DATE, format_date(date));
        Ok(request)
    }

    /// Marine weather. The location must be a latitude and longitude pair.
    pub fn marine(package: PackageType, key: &str, location: &str) -> Result<Self> {
        Self::new(
            Endpoint::Marine,
            package,
            key,
            LocationType::LatAndLong,
            location,
        )
    }

    pub fn ski(
        package: PackageType,
        key: &str,
        location_type: LocationType,
        location: &str,
        num_of_days: u32,
    ) -> Result<Self> {
        let config = Endpoint::Ski.config();
        let mut request = Self::seeded(config, package, key, location_type, location)?;
        check_count(config, package, num_of_days)?;
        request.params.set(param::NUM_OF_DAYS, num_of_days.to_string());
        Ok(request)
    }

    pub fn time_zone(
        package: PackageType,
        key: &str,
        location_type: LocationType,
        location: &str,
    ) -> Result<Self> {
        Self::new(Endpoint::TimeZone, package, key, location_type, location)
    }

    fn seeded(
        config: &'static EndpointConfig,
        package: PackageType,
        key: &str,
        location_type: LocationType,
        location: &str,
    ) -> Result<Self> {
        location::validate(location_type, location)?;
        if !config.accepts_location(location_type) {
            return Err(Error::LocationTypeNotAccepted {
                endpoint: config.endpoint,
                location_type,
            });
        }

        let mut params = ParameterSet::new();
        params.set(param::KEY, key);
        params.set(config.location_parameter, location);

        debug!(endpoint = %config.endpoint, %package, %location_type, "created request");

        Ok(Self {
            config,
            package,
            params,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        self.config.endpoint
    }

    pub fn package(&self) -> PackageType {
        self.package
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn require(&self, parameter: &str) -> Result<()> {
        if self.config.supports(parameter) {
            Ok(())
        } else {
            Err(Error::Unsupported {
                endpoint: self.config.endpoint,
                parameter: parameter.to_string(),
            })
        }
    }

    fn set(&mut self, key: &'static str, value: impl Into<String>) -> Result<&mut Self> {
        self.require(key)?;
        let value = value.into();
        debug!(endpoint = %self.config.endpoint, key, value = %value, "set parameter");
        self.params.set(key, value);
        Ok(self)
    }

    fn set_flag(&mut self, key: &'static str, on: bool) -> Result<&mut Self> {
        self.require(key)?;
        debug!(endpoint = %self.config.endpoint, key, on, "set flag");
        self.params.set_flag(key, on);
        Ok(self)
    }

    /// Number of search results. The valid range depends on the package:
    /// 1 to 3 in the free API, 1 to 50 in the premium API.
    pub fn num_of_results(&mut self, num_of_results: u32) -> Result<&mut Self> {
        self.require(param::NUM_OF_RESULTS)?;
        check_count(self.config, self.package, num_of_results)?;
        self.set(param::NUM_OF_RESULTS, num_of_results.to_string())
    }

    /// Adds extras to the request. Extras already present are skipped, so the
    /// result keeps the order in which each extra was first added.
    pub fn extras(&mut self, extras: &[Extra]) -> Result<&mut Self> {
        self.require(param::EXTRA)?;
        if let Some(extra) = extras.iter().find(|e| !self.config.extras.contains(*e)) {
            return Err(Error::Unsupported {
                endpoint: self.config.endpoint,
                parameter: format!("extra '{extra}'"),
            });
        }
        self.params.add_extras(extras.iter().copied());
        debug!(
            endpoint = %self.config.endpoint,
            extra = %self.params.extras().to_value(),
            "merged extras"
        );
        Ok(self)
    }

    /// Date of the ski forecast.
    pub fn date(&mut self, date: NaiveDate) -> Result<&mut Self> {
        self.set(param::DATE, format_date(date))
    }

    /// End of a historical date range.
    ///
    /// The end date must not precede the start date and must share its month
    /// and year.
    pub fn end_date(&mut self, end: NaiveDate) -> Result<&mut Self> {
        self.require(param::END_DATE)?;
        let stored = self.params.get(param::DATE).ok_or(Error::MissingArgument {
            endpoint: self.config.endpoint,
            argument: param::DATE,
        })?;
        let start = NaiveDate::parse_from_str(stored, DATE_FORMAT).map_err(|source| {
            Error::InvalidStoredDate {
                value: stored.to_string(),
                source,
            }
        })?;

        if end < start {
            return Err(Error::EndDateBeforeStart { start, end });
        }
        if end.month() != start.month() {
            return Err(Error::EndDateMonthMismatch { start, end });
        }
        if end.year() != start.year() {
            return Err(Error::EndDateYearMismatch { start, end });
        }

        self.set(param::END_DATE, format_date(end))
    }

    /// Whether to return the nearest weather point used for a postcode,
    /// zipcode or coordinate query.
    pub fn include_location(&mut self, include: bool) -> Result<&mut Self> {
        self.set_flag(param::INCLUDE_LOCATION, include)
    }

    /// Whether search results include the time zone offset.
    pub fn time_zone_offset(&mut self, timezone: bool) -> Result<&mut Self> {
        self.set_flag(param::TIMEZONE, timezone)
    }

    pub fn popular_only(&mut self, popular: bool) -> Result<&mut Self> {
        self.set_flag(param::POPULAR, popular)
    }

    /// Whether marine responses carry the forecast section.
    pub fn forecast_output(&mut self, fx: bool) -> Result<&mut Self> {
        self.set_flag(param::FORECAST, fx)
    }

    pub fn tide_data(&mut self, tide: bool) -> Result<&mut Self> {
        self.set_flag(param::TIDE, tide)
    }

    pub fn format(&mut self, format: Format) -> Result<&mut Self> {
        if !self.config.formats.contains(&format) {
            return Err(Error::Unsupported {
                endpoint: self.config.endpoint,
                parameter: format!("format '{format}'"),
            });
        }
        self.set(param::FORMAT, format.code())
    }

    /// Function name for a JSONP callback.
    pub fn callback(&mut self, function: &str) -> Result<&mut Self> {
        self.set(param::CALLBACK, function)
    }

    pub fn language(&mut self, language: Language) -> Result<&mut Self> {
        self.set(param::LANGUAGE, language.code())
    }

    pub fn category(&mut self, category: Category) -> Result<&mut Self> {
        self.set(param::CATEGORY, category.code())
    }

    pub fn interval(&mut self, interval: Interval) -> Result<&mut Self> {
        self.set(param::INTERVAL, interval.code())
    }

    /// Snapshot of the request ready to hand to a [`crate::Dispatcher`].
    pub fn to_request_spec(&self, scheme: Scheme) -> RequestSpec {
        RequestSpec {
            parameters: self.params.clone(),
            base_path: self.config.base_path(self.package).to_string(),
            host: HOST.to_string(),
            scheme,
        }
    }
}

fn check_count(config: &EndpointConfig, package: PackageType, value: u32) -> Result<()> {
    let Some(count) = &config.count else {
        return Ok(());
    };
    let bounds = count.bounds(package);
    if bounds.contains(&value) {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            parameter: count.parameter,
            package,
            value,
            min: *bounds.start(),
            max: *bounds.end(),
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

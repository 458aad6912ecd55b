use std::io::{self, Write};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use inquire::{Password, Select};
use tracing::{debug, info};
use wwo_core::{
    Category, Config, Dispatcher, Endpoint, Extra, Format, Interval, Language, LocationType,
    PackageType, Scheme, WeatherRequest,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wwo", version, about = "World Weather Online request client")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// API key; overrides WWO_API_KEY and the stored key.
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Package type: free or premium.
    #[arg(long, global = true)]
    pub package: Option<PackageType>,

    /// URI scheme: http or https.
    #[arg(long, global = true)]
    pub scheme: Option<Scheme>,

    /// Response format: xml, json, csv or tab (depending on the endpoint).
    #[arg(long, global = true)]
    pub format: Option<Format>,

    #[command(subcommand)]
    pub command: Command,
}

/// How to read the location argument.
#[derive(Debug, Args)]
pub struct LocationArgs {
    /// City name, IP address, postal code, zipcode or "lat,long".
    pub location: String,

    /// One of city, ip-address, uk-postal-code, canada-postal-code, us-zipcode, lat-and-long.
    #[arg(long = "type", default_value = "city")]
    pub location_type: LocationType,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default package.
    Configure,

    /// Search for locations.
    Search {
        #[command(flatten)]
        location: LocationArgs,

        #[arg(long)]
        num_of_results: Option<u32>,

        /// Include the time zone offset of each result.
        #[arg(long)]
        timezone: bool,

        /// Only return popular locations.
        #[arg(long)]
        popular: bool,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long = "extra", value_delimiter = ',')]
        extras: Vec<Extra>,
    },

    /// Past weather for a date, optionally up to an end date in the same month.
    Historical {
        #[command(flatten)]
        location: LocationArgs,

        /// Start date, YYYY-MM-DD.
        #[arg(long)]
        date: NaiveDate,

        /// End date, YYYY-MM-DD, same month and year as the start date.
        #[arg(long)]
        end_date: Option<NaiveDate>,

        #[arg(long)]
        include_location: bool,

        /// Interval in hours: 1, 3, 6, 12 or 24.
        #[arg(long)]
        interval: Option<Interval>,

        #[arg(long)]
        callback: Option<String>,

        #[arg(long = "extra", value_delimiter = ',')]
        extras: Vec<Extra>,
    },

    /// Marine weather for a "lat,long" location.
    Marine {
        location: String,

        /// Include the forecast section.
        #[arg(long)]
        fx: bool,

        #[arg(long)]
        tide: bool,

        #[arg(long)]
        interval: Option<Interval>,

        #[arg(long)]
        lang: Option<Language>,

        #[arg(long)]
        callback: Option<String>,
    },

    /// Ski resort weather.
    Ski {
        #[command(flatten)]
        location: LocationArgs,

        /// Number of forecast days.
        #[arg(long, default_value_t = 1)]
        days: u32,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        include_location: bool,

        #[arg(long)]
        interval: Option<Interval>,

        #[arg(long)]
        lang: Option<Language>,

        #[arg(long)]
        callback: Option<String>,

        #[arg(long = "extra", value_delimiter = ',')]
        extras: Vec<Extra>,
    },

    /// Local time and UTC offset of a location.
    TimeZone {
        #[command(flatten)]
        location: LocationArgs,

        #[arg(long)]
        callback: Option<String>,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load().context("Failed to load configuration")?;

        if let Command::Configure = self.command {
            return configure(&mut config);
        }

        let key = self.key.or_else(|| config.api_key()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `wwo configure`, set WWO_API_KEY or pass --key."
            )
        })?;
        let package = self.package.unwrap_or(config.package);
        let scheme = self.scheme.unwrap_or(config.scheme);

        let mut request = build_request(self.command, package, &key)?;
        if let Some(format) = self.format.or(config.format) {
            request.format(format)?;
        }

        fetch(&request, scheme)
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("World Weather Online API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let package = Select::new("Package type:", PackageType::all().to_vec())
        .prompt()
        .context("Failed to read package type")?;

    config.set_api_key(api_key.trim().to_string());
    config.package = package;
    config.save().context("Failed to save configuration")?;

    let path = Config::config_file_path()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn build_request(
    command: Command,
    package: PackageType,
    key: &str,
) -> anyhow::Result<WeatherRequest> {
    let request = match command {
        Command::Configure => return Err(anyhow!("`configure` does not send a request")),
        Command::Search {
            location,
            num_of_results,
            timezone,
            popular,
            category,
            extras,
        } => {
            let mut req =
                WeatherRequest::search(package, key, location.location_type, &location.location)?;
            if let Some(n) = num_of_results {
                req.num_of_results(n)?;
            }
            if timezone {
                req.time_zone_offset(true)?;
            }
            if popular {
                req.popular_only(true)?;
            }
            if let Some(category) = category {
                req.category(category)?;
            }
            if !extras.is_empty() {
                req.extras(&extras)?;
            }
            req
        }
        Command::Historical {
            location,
            date,
            end_date,
            include_location,
            interval,
            callback,
            extras,
        } => {
            let mut req = WeatherRequest::historical(
                package,
                key,
                location.location_type,
                &location.location,
                date,
            )?;
            if let Some(end) = end_date {
                req.end_date(end)?;
            }
            if include_location {
                req.include_location(true)?;
            }
            if let Some(interval) = interval {
                req.interval(interval)?;
            }
            if let Some(callback) = callback {
                req.callback(&callback)?;
            }
            if !extras.is_empty() {
                req.extras(&extras)?;
            }
            req
        }
        Command::Marine {
            location,
            fx,
            tide,
            interval,
            lang,
            callback,
        } => {
            let mut req = WeatherRequest::marine(package, key, &location)?;
            if fx {
                req.forecast_output(true)?;
            }
            if tide {
                req.tide_data(true)?;
            }
            if let Some(interval) = interval {
                req.interval(interval)?;
            }
            if let Some(lang) = lang {
                req.language(lang)?;
            }
            if let Some(callback) = callback {
                req.callback(&callback)?;
            }
            req
        }
        Command::Ski {
            location,
            days,
            date,
            include_location,
            interval,
            lang,
            callback,
            extras,
        } => {
            let mut req = WeatherRequest::ski(
                package,
                key,
                location.location_type,
                &location.location,
                days,
            )?;
            if let Some(date) = date {
                req.date(date)?;
            }
            if include_location {
                req.include_location(true)?;
            }
            if let Some(interval) = interval {
                req.interval(interval)?;
            }
            if let Some(lang) = lang {
                req.language(lang)?;
            }
            if let Some(callback) = callback {
                req.callback(&callback)?;
            }
            if !extras.is_empty() {
                req.extras(&extras)?;
            }
            req
        }
        Command::TimeZone { location, callback } => {
            let mut req = WeatherRequest::new(
                Endpoint::TimeZone,
                package,
                key,
                location.location_type,
                &location.location,
            )?;
            if let Some(callback) = callback {
                req.callback(&callback)?;
            }
            req
        }
    };

    debug!(endpoint = %request.endpoint(), params = request.parameters().len(), "request built");
    Ok(request)
}

/// Sends the request and streams the raw body to stdout.
fn fetch(request: &WeatherRequest, scheme: Scheme) -> anyhow::Result<()> {
    let spec = request.to_request_spec(scheme);
    let dispatcher = Dispatcher::new().context("Failed to create HTTP client")?;
    let mut body = dispatcher
        .send(&spec)
        .with_context(|| format!("Failed to send {} request", request.endpoint()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let copied = io::copy(&mut body, &mut out).context("Failed to read response body")?;
    writeln!(out)?;
    info!(bytes = copied, status = body.status(), "response written");
    Ok(())
}

//! Turning a finished request into one HTTP GET.

use reqwest::blocking::Client;
use std::{fmt, io::Read, time::Duration};
use tracing::{info, warn};
use url::{Url, form_urlencoded};

use crate::{
    endpoint::param,
    error::Result,
    options::Scheme,
    params::ParameterSet,
};

/// Everything needed to send one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub parameters: ParameterSet,
    pub base_path: String,
    pub host: String,
    pub scheme: Scheme,
}

impl RequestSpec {
    /// Form-urlencoded query, keys in sorted order.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.parameters.iter())
            .finish()
    }

    /// `scheme://host/base_path?query`
    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}://{}", self.scheme, self.host))?;
        url.set_path(&self.base_path);
        url.set_query(Some(&self.query_string()));
        Ok(url)
    }

    /// The URL with the API key masked, for logs.
    pub fn redacted_url(&self) -> String {
        let mut parameters = self.parameters.clone();
        if parameters.contains_key(param::KEY) {
            parameters.set(param::KEY, "***");
        }
        let redacted = RequestSpec {
            parameters,
            ..self.clone()
        };
        match redacted.url() {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}://{}{}", self.scheme, self.host, self.base_path),
        }
    }
}

/// Response body handed back to the caller, unread.
///
/// Dropping it releases the underlying connection.
pub struct ResponseBody {
    status: u16,
    reader: Box<dyn Read + Send>,
}

impl ResponseBody {
    pub fn new(status: u16, reader: impl Read + Send + 'static) -> Self {
        Self {
            status,
            reader: Box::new(reader),
        }
    }

    /// HTTP status of the response. The service reports most errors inside
    /// the body, so a non-2xx status is not turned into an error.
    pub fn status(&self) -> u16 {
        self.status
    }
}

impl Read for ResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// The HTTP black box: one GET, body returned as a stream.
pub trait Transport {
    fn get(&self, url: Url) -> Result<ResponseBody>;
}

/// Blocking reqwest transport without a cookie store.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: Client::builder().build()?,
        })
    }

    /// Transport with an explicit overall timeout instead of reqwest's default.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: Url) -> Result<ResponseBody> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "service answered with a non-success status");
        }
        Ok(ResponseBody::new(status.as_u16(), response))
    }
}

/// Sends [`RequestSpec`]s. Every call is independent; nothing is retried.
#[derive(Debug, Clone)]
pub struct Dispatcher<T = HttpTransport> {
    transport: T,
}

impl Dispatcher<HttpTransport> {
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::with_timeout(Some(
            timeout,
        ))?))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Issues the GET described by `spec` and returns the unread body.
    pub fn send(&self, spec: &RequestSpec) -> Result<ResponseBody> {
        let url = spec.url()?;
        info!(url = %spec.redacted_url(), "sending request");
        let body = self.transport.get(url)?;
        info!(status = body.status(), "response received");
        Ok(body)
    }
}

//! Connection parameter parsing and validation.
//!
//! This module handles parsing ODBC connection strings and building
//! connection parameters with validation.

use crate::error::ConnectionError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default server port.
pub const DEFAULT_PORT: u16 = 10800;

/// Default number of rows requested per fetch.
pub const DEFAULT_PAGE_SIZE: i32 = 1024;

/// Connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Driver name from the connection string, if any
    pub driver: Option<String>,

    /// Server host address
    pub host: String,

    /// Server port (default: 10800)
    pub port: u16,

    /// Default cache used when a metadata request names no schema
    pub cache: String,

    /// Rows requested per fetch round trip
    pub page_size: i32,

    /// Upper bound for a single server round trip
    pub query_timeout: Option<Duration>,

    /// Unrecognized connection string attributes
    pub attributes: HashMap<String, String>,
}

impl ConnectionParams {
    /// Create a new ConnectionBuilder.
    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::new()
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            driver: None,
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            cache: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            query_timeout: None,
            attributes: HashMap::new(),
        }
    }
}

impl FromStr for ConnectionParams {
    type Err = ConnectionError;

    /// Parse a connection string of `KEY=VALUE` pairs separated by `;`.
    ///
    /// Keys are case-insensitive. Values may be wrapped in braces.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ignite_odbc::connection::ConnectionParams;
    /// # use std::str::FromStr;
    /// let params = ConnectionParams::from_str(
    ///     "DRIVER={Apache Ignite};ADDRESS=127.0.0.1:10800;CACHE=Person;PAGE_SIZE=256"
    /// )?;
    /// assert_eq!(params.cache, "Person");
    /// assert_eq!(params.page_size, 256);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut builder = ConnectionBuilder::new();

        for pair in s.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair.split_once('=').ok_or_else(|| {
                ConnectionError::ParseError(format!("Invalid attribute format: {}", pair))
            })?;

            let key = key.trim().to_uppercase();
            let value = strip_braces(value.trim());

            builder = match key.as_str() {
                "DRIVER" => builder.driver(value),
                "ADDRESS" => {
                    let (host, port) = parse_host_port(value)?;
                    builder.host(&host).port(port)
                }
                "SERVER" | "HOST" => builder.host(value),
                "PORT" => builder.port(parse_number(&key, value)?),
                "CACHE" | "SCHEMA" => builder.cache(value),
                "PAGE_SIZE" => builder.page_size(parse_number(&key, value)?),
                "QUERY_TIMEOUT" => {
                    builder.query_timeout(Duration::from_secs(parse_number(&key, value)?))
                }
                _ => builder.attribute(&key, value),
            };
        }

        builder.build()
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cache", &self.cache)
            .field("page_size", &self.page_size)
            .field("query_timeout", &self.query_timeout)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConnectionParams {{ address: {}:{}, cache: {:?}, page_size: {} }}",
            self.host, self.port, self.cache, self.page_size
        )
    }
}

/// Builder for constructing ConnectionParams with validation.
#[derive(Debug, Clone, Default)]
pub struct ConnectionBuilder {
    driver: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    cache: Option<String>,
    page_size: Option<i32>,
    query_timeout: Option<Duration>,
    attributes: HashMap<String, String>,
}

impl ConnectionBuilder {
    /// Create a new ConnectionBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the driver name.
    pub fn driver(mut self, driver: &str) -> Self {
        self.driver = Some(driver.to_string());
        self
    }

    /// Set the server host.
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the default cache.
    pub fn cache(mut self, cache: &str) -> Self {
        self.cache = Some(cache.to_string());
        self
    }

    /// Set the fetch page size.
    pub fn page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the per round trip timeout.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Add a custom connection attribute.
    pub fn attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Build the ConnectionParams with validation.
    pub fn build(self) -> Result<ConnectionParams, ConnectionError> {
        let defaults = ConnectionParams::default();

        let host = self.host.unwrap_or(defaults.host);
        if host.is_empty() {
            return Err(ConnectionError::InvalidParameter {
                parameter: "host".to_string(),
                message: "Host cannot be empty".to_string(),
            });
        }

        let port = self.port.unwrap_or(defaults.port);
        if port == 0 {
            return Err(ConnectionError::InvalidParameter {
                parameter: "port".to_string(),
                message: "Port must be greater than 0".to_string(),
            });
        }

        let page_size = self.page_size.unwrap_or(defaults.page_size);
        if page_size <= 0 {
            return Err(ConnectionError::InvalidParameter {
                parameter: "page_size".to_string(),
                message: "Page size must be greater than 0".to_string(),
            });
        }

        let query_timeout = self.query_timeout.filter(|timeout| !timeout.is_zero());

        Ok(ConnectionParams {
            driver: self.driver,
            host,
            port,
            cache: self.cache.unwrap_or_default(),
            page_size,
            query_timeout,
            attributes: self.attributes,
        })
    }
}

fn strip_braces(value: &str) -> &str {
    value
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
        .unwrap_or(value)
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConnectionError> {
    value.parse().map_err(|_| ConnectionError::InvalidParameter {
        parameter: key.to_string(),
        message: format!("Invalid numeric value: {}", value),
    })
}

/// Parse `host[:port]`.
fn parse_host_port(host_port: &str) -> Result<(String, u16), ConnectionError> {
    match host_port.rsplit_once(':') {
        Some((host, port_str)) => {
            let port = port_str
                .parse()
                .map_err(|_| ConnectionError::ParseError(format!("Invalid port: {}", port_str)))?;
            Ok((host.to_string(), port))
        }
        None => Ok((host_port.to_string(), DEFAULT_PORT)),
    }
}

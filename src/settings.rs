// Copyright (c) 2025 - Cowboy AI, Inc.

//! Controller connection configuration
//!
//! Connections are read from the `NVP` section of a key/value source. Two
//! layouts are understood.
//!
//! New style, any number of controllers sharing one default zone:
//!
//! ```ini
//! [NVP]
//! DEFAULT_TZ_UUID = 1e8d0e2a-7a43-4f7b-9b5e-3c6d5e0e1a01
//! NVP_CONTROLLER_CONNECTIONS = CONN_1 CONN_2
//! CONN_1 = 10.0.0.1:443:admin:secret:30:10:2:2
//! CONN_2 = "https://nvp-b.example.com":443:admin:secret:30:10:2:2
//! ```
//!
//! Each connection value is `ip:port:user:password:request_timeout:
//! http_timeout:retries:redirects`, timeouts in seconds. Fields may be
//! double-quoted when they contain a colon.
//!
//! Legacy style, a single controller:
//!
//! ```ini
//! [NVP]
//! DEFAULT_TZ_UUID = 1e8d0e2a-7a43-4f7b-9b5e-3c6d5e0e1a01
//! NVP_CONTROLLER_IP = 10.0.0.1
//! PORT = 443
//! USER = admin
//! PASSWORD = secret
//! ```
//!
//! The new layout is tried first; if anything about it is missing or
//! malformed the legacy keys are tried. Failure of both is fatal.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use ini::{Ini, ParseOption};
use tracing::{error, info};

use crate::connection::{ConnectionDescriptor, ConnectionPool};
use crate::errors::{PluginError, PluginResult};

/// Section holding every controller setting
pub const SECTION: &str = "NVP";

pub const DEFAULT_TZ_KEY: &str = "DEFAULT_TZ_UUID";
pub const CONNECTIONS_KEY: &str = "NVP_CONTROLLER_CONNECTIONS";

/// Number of colon separated fields in a new-style connection entry
pub const CONNECTION_FIELDS: usize = 8;

/// Read access to sectioned key/value configuration
///
/// Section and key lookups are case-insensitive.
pub trait ConfigSource {
    fn get(&self, section: &str, key: &str) -> Option<String>;
}

/// In-memory configuration, used directly by tests and embedders
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    values: HashMap<String, String>,
}

impl MemoryConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.values.insert(Self::slot(section, key), value.into());
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, section: &str, key: &str, value: impl Into<String>) -> Self {
        self.set(section, key, value);
        self
    }

    fn slot(section: &str, key: &str) -> String {
        format!("{}.{}", section.to_lowercase(), key.to_lowercase())
    }
}

impl ConfigSource for MemoryConfigSource {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.values.get(&Self::slot(section, key)).cloned()
    }
}

/// INI file configuration
///
/// Values are kept byte for byte: quotes and backslashes reach the
/// connection entry parser untouched.
#[derive(Debug, Clone)]
pub struct IniConfigSource {
    values: MemoryConfigSource,
}

impl IniConfigSource {
    /// Load an INI file from disk
    pub fn from_file(path: impl AsRef<Path>) -> PluginResult<Self> {
        let path = path.as_ref();
        info!("Loading config file {}", path.display());
        Ok(Self::from_ini(&Ini::load_from_file_opt(path, raw_values())?))
    }

    /// Parse INI text held in memory
    pub fn from_ini_str(contents: &str) -> PluginResult<Self> {
        Ok(Self::from_ini(&Ini::load_from_str_opt(contents, raw_values())?))
    }

    fn from_ini(ini: &Ini) -> Self {
        let mut values = MemoryConfigSource::new();
        for (section, properties) in ini.iter() {
            // keys outside any section carry nothing we read
            let Some(section) = section else {
                continue;
            };
            for (key, value) in properties.iter() {
                values.set(section, key, value);
            }
        }
        Self { values }
    }
}

fn raw_values() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

impl ConfigSource for IniConfigSource {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.values.get(section, key)
    }
}

/// Build the connection pool from configuration
///
/// Returns a non-empty pool or a [`PluginError::ConfigurationError`].
pub fn load_pool(source: &dyn ConfigSource) -> PluginResult<ConnectionPool> {
    let pool = match load_connections(source) {
        Ok(pool) => pool,
        Err(e) => {
            info!("Could not find new config format ({}), trying old", e);
            load_legacy_connection(source).map_err(|e| {
                error!("Invalid connection parameters: {}", e);
                e
            })?
        }
    };

    info!("Loaded {} controller connection(s)", pool.len());
    for conn in pool.iter() {
        info!("  - {}", conn.describe());
    }
    Ok(pool)
}

/// Load the pool from an INI file on disk
pub fn load_pool_from_file(path: impl AsRef<Path>) -> PluginResult<ConnectionPool> {
    let source = IniConfigSource::from_file(path)?;
    load_pool(&source)
}

fn require(source: &dyn ConfigSource, key: &str) -> PluginResult<String> {
    source.get(SECTION, key).ok_or_else(|| {
        PluginError::ConfigurationError(format!("missing option {}.{}", SECTION, key))
    })
}

fn load_connections(source: &dyn ConfigSource) -> PluginResult<ConnectionPool> {
    let default_tz = require(source, DEFAULT_TZ_KEY)?;
    let defined = require(source, CONNECTIONS_KEY)?;

    let mut pool = ConnectionPool::new();
    for conn_key in defined.split_whitespace() {
        let raw = require(source, conn_key)?;
        let descriptor = parse_connection(conn_key, &raw, &default_tz)?;
        pool.add(descriptor);
    }

    if pool.is_empty() {
        return Err(PluginError::ConfigurationError(format!(
            "{} lists no connections",
            CONNECTIONS_KEY
        )));
    }
    Ok(pool)
}

fn load_legacy_connection(source: &dyn ConfigSource) -> PluginResult<ConnectionPool> {
    let default_tz = require(source, DEFAULT_TZ_KEY)?;
    let ip = require(source, "NVP_CONTROLLER_IP")?;
    let port = parse_field::<u16>("PORT", &require(source, "PORT")?)?;
    let user = require(source, "USER")?;
    let password = require(source, "PASSWORD")?;

    let mut pool = ConnectionPool::new();
    pool.add(ConnectionDescriptor::new(ip, port, user, password, default_tz));
    Ok(pool)
}

/// Parse one `ip:port:user:password:timeout:http_timeout:retries:redirects` entry
pub fn parse_connection(
    name: &str,
    raw: &str,
    default_tz: &str,
) -> PluginResult<ConnectionDescriptor> {
    let fields = split_fields(raw)?;
    if fields.len() != CONNECTION_FIELDS {
        return Err(PluginError::ConfigurationError(format!(
            "connection {} has {} fields, expected {}",
            name,
            fields.len(),
            CONNECTION_FIELDS
        )));
    }

    let port = parse_field::<u16>("port", &fields[1])?;
    let request_timeout = parse_field::<u64>("request_timeout", &fields[4])?;
    let http_timeout = parse_field::<u64>("http_timeout", &fields[5])?;
    let retries = parse_field::<u32>("retries", &fields[6])?;
    let redirects = parse_field::<u32>("redirects", &fields[7])?;

    Ok(
        ConnectionDescriptor::new(&fields[0], port, &fields[2], &fields[3], default_tz)
            .with_timeouts(
                Duration::from_secs(request_timeout),
                Duration::from_secs(http_timeout),
            )
            .with_limits(retries, redirects),
    )
}

fn split_fields(raw: &str) -> PluginResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b':')
        .quote(b'"')
        .has_headers(false)
        .from_reader(raw.trim().as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|f| f.trim().to_string()).collect()),
        None => Err(PluginError::ConfigurationError(
            "empty connection entry".to_string(),
        )),
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> PluginResult<T> {
    value.trim().parse().map_err(|_| {
        PluginError::ConfigurationError(format!("invalid {} value: {:?}", name, value))
    })
}

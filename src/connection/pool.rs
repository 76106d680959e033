// Copyright (c) 2025 - Cowboy AI, Inc.

//! Controller connection descriptors and the pool that owns them

use std::fmt;
use std::time::Duration;

/// Request timeout applied when the configuration does not give one
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-attempt HTTP timeout applied when the configuration does not give one
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Retries applied when the configuration does not give a count
pub const DEFAULT_RETRIES: u32 = 2;

/// Redirects followed when the configuration does not give a count
pub const DEFAULT_REDIRECTS: u32 = 2;

/// One configured controller endpoint
///
/// `sequence_id` and `error_count` are owned by the pool: the first is
/// assigned on insertion, the second only moves through
/// [`ConnectionSelector::report_error`](super::ConnectionSelector::report_error).
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    /// Controller host, optionally with an explicit `http://` or `https://` scheme
    pub endpoint_host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Transport zone bound to networks created without an explicit zone
    pub default_transport_zone_id: String,
    /// Upper bound for a whole controller call, retries included
    pub request_timeout: Duration,
    /// Upper bound for a single HTTP attempt
    pub http_timeout: Duration,
    pub retry_count: u32,
    pub redirect_count: u32,
    pub sequence_id: u32,
    pub error_count: u64,
}

impl ConnectionDescriptor {
    /// Create a descriptor with default timeouts, retries and redirects
    pub fn new(
        endpoint_host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        default_transport_zone_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_host: endpoint_host.into(),
            port,
            username: username.into(),
            password: password.into(),
            default_transport_zone_id: default_transport_zone_id.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            retry_count: DEFAULT_RETRIES,
            redirect_count: DEFAULT_REDIRECTS,
            sequence_id: 0,
            error_count: 0,
        }
    }

    /// Set the request and per-attempt HTTP timeouts
    pub fn with_timeouts(mut self, request_timeout: Duration, http_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.http_timeout = http_timeout;
        self
    }

    /// Set the retry and redirect limits
    pub fn with_limits(mut self, retry_count: u32, redirect_count: u32) -> Self {
        self.retry_count = retry_count;
        self.redirect_count = redirect_count;
        self
    }

    /// URL scheme used to reach the controller
    ///
    /// An explicit scheme in the host wins; otherwise port 443 means https.
    pub fn scheme(&self) -> &'static str {
        if self.endpoint_host.starts_with("https://") {
            "https"
        } else if self.endpoint_host.starts_with("http://") || self.port != 443 {
            "http"
        } else {
            "https"
        }
    }

    /// Base URL every resource path is appended to
    pub fn base_url(&self) -> String {
        if self.has_embedded_scheme() {
            self.endpoint_host.trim_end_matches('/').to_string()
        } else {
            format!("{}://{}:{}", self.scheme(), self.endpoint_host, self.port)
        }
    }

    /// Short human readable form used in log lines and error messages
    pub fn describe(&self) -> String {
        format!("{}:{} (#{})", self.endpoint_host, self.port, self.sequence_id)
    }

    fn has_embedded_scheme(&self) -> bool {
        self.endpoint_host.starts_with("http://") || self.endpoint_host.starts_with("https://")
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("endpoint_host", &self.endpoint_host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("default_transport_zone_id", &self.default_transport_zone_id)
            .field("request_timeout", &self.request_timeout)
            .field("http_timeout", &self.http_timeout)
            .field("retry_count", &self.retry_count)
            .field("redirect_count", &self.redirect_count)
            .field("sequence_id", &self.sequence_id)
            .field("error_count", &self.error_count)
            .finish()
    }
}

/// Ordered set of controller connections
///
/// Sequence ids are handed out in insertion order starting at 0, so the
/// position of a descriptor and its sequence id always agree.
#[derive(Debug, Clone, Default)]
pub struct ConnectionPool {
    connections: Vec<ConnectionDescriptor>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, returning its assigned sequence id
    pub fn add(&mut self, mut descriptor: ConnectionDescriptor) -> u32 {
        let sequence_id = self.connections.len() as u32;
        descriptor.sequence_id = sequence_id;
        descriptor.error_count = 0;
        self.connections.push(descriptor);
        sequence_id
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn get(&self, sequence_id: u32) -> Option<&ConnectionDescriptor> {
        self.connections.get(sequence_id as usize)
    }

    /// Descriptor by sequence id; callers guarantee the id was issued by this pool
    pub(crate) fn descriptor(&self, sequence_id: u32) -> &ConnectionDescriptor {
        &self.connections[sequence_id as usize]
    }

    pub(crate) fn get_mut(&mut self, sequence_id: u32) -> Option<&mut ConnectionDescriptor> {
        self.connections.get_mut(sequence_id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionDescriptor> {
        self.connections.iter()
    }

    /// Sequence id of the healthiest connection
    ///
    /// Lowest error count wins; ties go to the lowest sequence id.
    pub fn least_errors(&self) -> Option<u32> {
        self.connections
            .iter()
            .min_by_key(|c| (c.error_count, c.sequence_id))
            .map(|c| c.sequence_id)
    }
}

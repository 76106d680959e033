// Copyright (c) 2025 - Cowboy AI, Inc.

//! REST controller client
//!
//! Issues logical switch and logical port requests against whichever
//! connection the [`ConnectionSelector`] currently considers healthiest:
//!
//! ```text
//! read_switch(ls)            = GET    /ws.v1/lswitch/{ls}
//! create_switch(spec)        = POST   /ws.v1/lswitch
//! query_switches(q)          = GET    /ws.v1/lswitch?fields=..&tag=..&tag_scope=..
//! create_port(ls, spec)      = POST   /ws.v1/lswitch/{ls}/lport
//! set_attachment(ls, lp, a)  = PUT    /ws.v1/lswitch/{ls}/lport/{lp}/attachment
//! read_link_status(ls, lp)   = GET    /ws.v1/lswitch/{ls}/lport/{lp}/status
//! ```
//!
//! # Failure handling
//!
//! - Each HTTP attempt is bounded by the connection's `http_timeout`; the
//!   whole call, retries included, by its `request_timeout`.
//! - GET and DELETE are retried up to `retry_count` times on transport
//!   errors, timeouts and 5xx answers. 404 and 409 are final.
//! - Redirects are followed up to `redirect_count` hops.
//! - Any failed call is reported to the selector before it is returned, so
//!   the next call may run on a different connection. The failing call
//!   itself is never moved to another connection.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::resources::{PortStatus, QueryResults};
use super::{
    Controller, ControllerFault, ControllerResult, LinkState, LogicalPort, LogicalPortSpec,
    LogicalSwitch, LogicalSwitchSpec, LogicalSwitchUpdate, PortAttachment, PortQuery, PortStats,
    SwitchQuery, TransportZone,
};
use crate::connection::{ConnectionDescriptor, ConnectionSelector};

/// Root of every controller resource path
pub const API_ROOT: &str = "/ws.v1";

/// One controller request, independent of the connection it runs on
#[derive(Debug, Clone)]
struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: Method, path: String) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    fn get(path: String) -> Self {
        Self::new(Method::GET, path)
    }

    fn delete(path: String) -> Self {
        Self::new(Method::DELETE, path)
    }

    fn with_body<T: Serialize>(method: Method, path: String, body: &T) -> ControllerResult<Self> {
        let mut request = Self::new(method, path);
        request.body = Some(serde_json::to_value(body)?);
        Ok(request)
    }

    fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Reads and deletes may be repeated without changing the outcome
    fn is_retryable(&self) -> bool {
        self.method == Method::GET || self.method == Method::DELETE
    }
}

/// Outcome of a single failed HTTP attempt
enum AttemptError {
    Retry(ControllerFault),
    Final(ControllerFault),
}

fn switch_path(switch_id: &str) -> String {
    format!("{}/lswitch/{}", API_ROOT, urlencoding::encode(switch_id))
}

fn port_path(switch_id: &str, port_id: &str) -> String {
    format!(
        "{}/lport/{}",
        switch_path(switch_id),
        urlencoding::encode(port_id)
    )
}

fn json_body<T: DeserializeOwned>(body: &str) -> ControllerResult<T> {
    Ok(serde_json::from_str(body)?)
}

fn ignore_body(_body: &str) -> ControllerResult<()> {
    Ok(())
}

/// Controller client speaking the controller's REST API over HTTP
pub struct HttpController {
    selector: Arc<ConnectionSelector>,
    /// One client per connection, indexed by sequence id
    clients: Vec<Client>,
}

impl HttpController {
    /// Build an HTTP client for every connection in the selector's pool
    pub fn new(selector: Arc<ConnectionSelector>) -> ControllerResult<Self> {
        let clients = selector
            .snapshot()
            .iter()
            .map(Self::build_client)
            .collect::<ControllerResult<Vec<_>>>()?;

        Ok(Self { selector, clients })
    }

    fn build_client(conn: &ConnectionDescriptor) -> ControllerResult<Client> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        Client::builder()
            .timeout(conn.http_timeout)
            .redirect(reqwest::redirect::Policy::limited(
                conn.redirect_count as usize,
            ))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ControllerFault::Fault(format!(
                    "Failed to create HTTP client for {}: {}",
                    conn.describe(),
                    e
                ))
            })
    }

    /// Selector shared with this client
    pub fn selector(&self) -> &Arc<ConnectionSelector> {
        &self.selector
    }

    /// Run a request on the active connection and decode its body
    async fn dispatch<T>(
        &self,
        request: ApiRequest,
        decode: fn(&str) -> ControllerResult<T>,
    ) -> ControllerResult<T> {
        let conn = self.selector.active();

        let outcome = match tokio::time::timeout(
            conn.request_timeout,
            self.send_with_retries(&conn, &request),
        )
        .await
        {
            Ok(result) => result.and_then(|body| decode(&body)),
            Err(_) => Err(ControllerFault::Fault(format!(
                "{} {} on {} exceeded {:?}",
                request.method,
                request.path,
                conn.describe(),
                conn.request_timeout
            ))),
        };

        if let Err(fault) = &outcome {
            warn!(
                "{} {} failed on {}: {}",
                request.method,
                request.path,
                conn.describe(),
                fault
            );
            self.selector.report_error(&conn);
        }
        outcome
    }

    async fn send_with_retries(
        &self,
        conn: &ConnectionDescriptor,
        request: &ApiRequest,
    ) -> ControllerResult<String> {
        let client = self.clients.get(conn.sequence_id as usize).ok_or_else(|| {
            ControllerFault::Fault(format!("no HTTP client for {}", conn.describe()))
        })?;
        let url = format!("{}{}", conn.base_url(), request.path);
        let attempts = if request.is_retryable() {
            conn.retry_count + 1
        } else {
            1
        };

        let mut last = ControllerFault::Fault(format!("{} {} was never sent", request.method, url));
        for attempt in 1..=attempts {
            match self.send_once(client, conn, &url, request).await {
                Ok(body) => return Ok(body),
                Err(AttemptError::Final(fault)) => return Err(fault),
                Err(AttemptError::Retry(fault)) => {
                    debug!(
                        "Attempt {}/{} of {} {} failed: {}",
                        attempt, attempts, request.method, url, fault
                    );
                    last = fault;
                }
            }
        }
        Err(last)
    }

    async fn send_once(
        &self,
        client: &Client,
        conn: &ConnectionDescriptor,
        url: &str,
        request: &ApiRequest,
    ) -> Result<String, AttemptError> {
        let mut builder = client
            .request(request.method.clone(), url)
            .basic_auth(&conn.username, Some(&conn.password));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AttemptError::Retry(ControllerFault::from(e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Retry(ControllerFault::from(e)))?;

        if status.is_success() {
            debug!("{} {} -> {}", request.method, url, status);
            return Ok(body);
        }

        match status {
            StatusCode::NOT_FOUND => Err(AttemptError::Final(ControllerFault::NotFound(
                format!("{} {}", request.method, url),
            ))),
            StatusCode::CONFLICT => Err(AttemptError::Final(ControllerFault::Conflict(
                format!("{} {}: {}", request.method, url, body),
            ))),
            s if s.is_server_error() => Err(AttemptError::Retry(ControllerFault::Fault(
                format!("{} {} returned {}: {}", request.method, url, s, body),
            ))),
            s => Err(AttemptError::Final(ControllerFault::Fault(format!(
                "{} {} returned {}: {}",
                request.method, url, s, body
            )))),
        }
    }
}

#[async_trait]
impl Controller for HttpController {
    fn default_transport_zone(&self) -> String {
        self.selector.active().default_transport_zone_id
    }

    fn describe_connection(&self) -> String {
        self.selector.active().describe()
    }

    async fn read_transport_zone(&self, zone_id: &str) -> ControllerResult<TransportZone> {
        let path = format!("{}/transport-zone/{}", API_ROOT, urlencoding::encode(zone_id));
        self.dispatch(ApiRequest::get(path), json_body).await
    }

    async fn read_switch(&self, switch_id: &str) -> ControllerResult<LogicalSwitch> {
        self.dispatch(ApiRequest::get(switch_path(switch_id)), json_body)
            .await
    }

    async fn create_switch(&self, spec: &LogicalSwitchSpec) -> ControllerResult<LogicalSwitch> {
        let path = format!("{}/lswitch", API_ROOT);
        let request = ApiRequest::with_body(Method::POST, path, spec)?;
        self.dispatch(request, json_body).await
    }

    async fn update_switch(
        &self,
        switch_id: &str,
        update: &LogicalSwitchUpdate,
    ) -> ControllerResult<LogicalSwitch> {
        let request = ApiRequest::with_body(Method::PUT, switch_path(switch_id), update)?;
        self.dispatch(request, json_body).await
    }

    async fn delete_switch(&self, switch_id: &str) -> ControllerResult<()> {
        self.dispatch(ApiRequest::delete(switch_path(switch_id)), ignore_body)
            .await
    }

    async fn query_switches(&self, query: &SwitchQuery) -> ControllerResult<Vec<LogicalSwitch>> {
        let mut request = ApiRequest::get(format!("{}/lswitch", API_ROOT));
        if !query.fields.is_empty() {
            request = request.param("fields", query.fields.join(","));
        }
        for tag in &query.tags {
            request = request
                .param("tag", tag.tag.as_str())
                .param("tag_scope", tag.scope.as_str());
        }

        let results = self
            .dispatch(request, json_body::<QueryResults<LogicalSwitch>>)
            .await?;
        Ok(results.results)
    }

    async fn read_port(
        &self,
        switch_id: &str,
        port_id: &str,
        relations: Option<&str>,
    ) -> ControllerResult<LogicalPort> {
        let mut request = ApiRequest::get(port_path(switch_id, port_id));
        if let Some(relations) = relations {
            request = request.param("relations", relations);
        }
        self.dispatch(request, json_body).await
    }

    async fn create_port(
        &self,
        switch_id: &str,
        spec: &LogicalPortSpec,
    ) -> ControllerResult<LogicalPort> {
        let path = format!("{}/lport", switch_path(switch_id));
        let request = ApiRequest::with_body(Method::POST, path, spec)?;
        self.dispatch(request, json_body).await
    }

    async fn update_port(
        &self,
        switch_id: &str,
        port_id: &str,
        spec: &LogicalPortSpec,
    ) -> ControllerResult<LogicalPort> {
        let request = ApiRequest::with_body(Method::PUT, port_path(switch_id, port_id), spec)?;
        self.dispatch(request, json_body).await
    }

    async fn delete_port(&self, switch_id: &str, port_id: &str) -> ControllerResult<()> {
        self.dispatch(ApiRequest::delete(port_path(switch_id, port_id)), ignore_body)
            .await
    }

    async fn query_ports(
        &self,
        switch_id: &str,
        query: &PortQuery,
    ) -> ControllerResult<Vec<LogicalPort>> {
        let mut request = ApiRequest::get(format!("{}/lport", switch_path(switch_id)));
        if !query.fields.is_empty() {
            request = request.param("fields", query.fields.join(","));
        }
        if let Some(relations) = &query.relations {
            request = request.param("relations", relations.as_str());
        }
        if let Some(vif_uuid) = &query.attachment_vif_uuid {
            request = request.param("attachment_vif_uuid", vif_uuid.as_str());
        }

        let results = self
            .dispatch(request, json_body::<QueryResults<LogicalPort>>)
            .await?;
        Ok(results.results)
    }

    async fn set_attachment(
        &self,
        switch_id: &str,
        port_id: &str,
        attachment: &PortAttachment,
    ) -> ControllerResult<()> {
        let path = format!("{}/attachment", port_path(switch_id, port_id));
        let request = ApiRequest::with_body(Method::PUT, path, attachment)?;
        self.dispatch(request, ignore_body).await
    }

    async fn read_link_status(
        &self,
        switch_id: &str,
        port_id: &str,
    ) -> ControllerResult<LinkState> {
        let path = format!("{}/status", port_path(switch_id, port_id));
        let status = self
            .dispatch(ApiRequest::get(path), json_body::<PortStatus>)
            .await?;
        Ok(status.into())
    }

    async fn read_port_stats(
        &self,
        switch_id: &str,
        port_id: &str,
    ) -> ControllerResult<PortStats> {
        let path = format!("{}/statistic", port_path(switch_id, port_id));
        self.dispatch(ApiRequest::get(path), json_body).await
    }
}

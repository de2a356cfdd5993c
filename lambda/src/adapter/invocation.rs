//! Bridges a single-shot Lambda invocation to a request/response listener.
//!
//! The chat connector is written against a long-lived listener interface: it
//! receives a request, records a status on the response and ends it. A Lambda
//! invocation instead hands over one event and expects one result. The types
//! here build a request/response pair per invocation and resolve the
//! invocation exactly once, however the listener drives the response.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::errors::BotError;

/// Status reported when the listener returns without ending the response and
/// without having recorded a status.
pub const UNFINISHED_STATUS: u16 = 500;

/// Status reported when the listener ends the response without recording one.
pub const DEFAULT_STATUS: u16 = 200;

/// The part of an API Gateway proxy event the adapter consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationEvent {
    pub body: Option<String>,
    pub headers: HashMap<String, String>,
}

impl InvocationEvent {
    /// Extracts the body and headers from a raw Lambda payload.
    ///
    /// Non-string header values are skipped; a non-string body is treated as
    /// absent.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let body = payload
            .get("body")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        let headers = payload
            .get("headers")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        Self { body, headers }
    }
}

/// Result handed back to the invoking runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Request object seen by the listener.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerRequest {
    pub body: Value,
    pub headers: HashMap<String, String>,
}

impl ListenerRequest {
    /// # Errors
    ///
    /// Returns `BotError::MalformedInvocation` if the body is missing or is not
    /// valid JSON.
    pub fn from_event(event: InvocationEvent) -> Result<Self, BotError> {
        let raw = event
            .body
            .ok_or_else(|| BotError::MalformedInvocation("missing body".to_string()))?;
        let body = serde_json::from_str(&raw)
            .map_err(|e| BotError::MalformedInvocation(format!("invalid JSON body: {e}")))?;

        Ok(Self {
            body,
            headers: event.headers,
        })
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(v) = self.headers.get(name) {
            return Some(v);
        }
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Completion callback of one invocation.
pub type Completion = Box<dyn FnOnce(Result<InvocationResult, BotError>) + Send>;

enum ShimState {
    Pending(Completion),
    Completed,
}

/// Response object seen by the listener.
///
/// Starts pending and moves to completed on the first `end`. The completion is
/// consumed by that transition, so it cannot fire twice.
pub struct ResponseShim {
    status_code: Option<u16>,
    state: ShimState,
}

impl ResponseShim {
    #[must_use]
    pub fn new(completion: Completion) -> Self {
        Self {
            status_code: None,
            state: ShimState::Pending(completion),
        }
    }

    /// Records the status to report. Last write wins; ignored once completed.
    pub fn status(&mut self, code: u16) -> &mut Self {
        if self.is_completed() {
            warn!(status_code = code, "status set after response ended; ignored");
        } else {
            self.status_code = Some(code);
        }
        self
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.state, ShimState::Completed)
    }

    /// Resolves the invocation with the recorded status.
    ///
    /// Returns `false` if the response had already ended.
    pub fn end(&mut self) -> bool {
        match std::mem::replace(&mut self.state, ShimState::Completed) {
            ShimState::Pending(completion) => {
                let status_code = self.status_code.unwrap_or(DEFAULT_STATUS);
                debug!(status_code, "response ended");
                completion(Ok(InvocationResult { status_code }));
                true
            }
            ShimState::Completed => {
                warn!("response ended more than once; ignored");
                false
            }
        }
    }
}

impl fmt::Debug for ResponseShim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseShim")
            .field("status_code", &self.status_code)
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// A long-lived request/response handler.
#[async_trait]
pub trait Listener: Send + Sync {
    async fn listen(&self, request: ListenerRequest, response: &mut ResponseShim);
}

/// Runs one invocation through `listener`, resolving `completion` exactly once.
///
/// A malformed event resolves with `BotError::MalformedInvocation` without
/// reaching the listener.
pub async fn adapt<L>(listener: &L, event: InvocationEvent, completion: Completion)
where
    L: Listener + ?Sized,
{
    let request = match ListenerRequest::from_event(event) {
        Ok(request) => request,
        Err(e) => {
            completion(Err(e));
            return;
        }
    };

    let mut response = ResponseShim::new(completion);
    listener.listen(request, &mut response).await;

    if !response.is_completed() {
        warn!(
            status_code = ?response.status_code(),
            "listener returned without ending the response"
        );
        if response.status_code().is_none() {
            response.status(UNFINISHED_STATUS);
        }
        response.end();
    }
}

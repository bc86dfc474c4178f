//! Error types for the pbase client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, server, decoding and input validation errors.
//! Record operations wrap everything except authentication failures in an
//! [`Error::Operation`] layer naming the call that failed.

use std::fmt;
use thiserror::Error;

/// Maximum number of body bytes kept in a [`DecodeError`] excerpt.
const BODY_EXCERPT_LEN: usize = 512;

/// The unified error type for pbase operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or no response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No credential could be produced for the configured strategy.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The server answered with a non-2xx status.
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Caller supplied input that cannot form a request.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// An error raised while running a tagged client operation.
    #[error("[{op}] {source}")]
    Operation {
        op: Operation,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Tag this error with the operation that produced it.
    ///
    /// Authentication errors are returned as-is: they abort an operation
    /// before its request is sent, so there is nothing to attribute.
    pub fn in_operation(self, op: Operation) -> Self {
        match self {
            Error::Auth(_) | Error::Operation { .. } => self,
            other => Error::Operation {
                op,
                source: Box::new(other),
            },
        }
    }

    /// Returns the operation tag, if this error carries one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::Operation { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Returns the innermost error with operation tags removed.
    pub fn root(&self) -> &Error {
        let mut current = self;
        while let Error::Operation { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns the HTTP status of a server or auth rejection.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Error::Server(e) => Some(e.status),
            Error::Auth(AuthError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Check if this is an authentication failure or a 401 from the server.
    pub fn is_auth_error(&self) -> bool {
        match self.root() {
            Error::Auth(_) => true,
            Error::Server(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Check if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Names of the client operations that tag their errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    List,
    FullList,
    Collections,
    Backups,
    Files,
}

impl Operation {
    /// Returns the lowercase tag used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::List => "list",
            Operation::FullList => "full_list",
            Operation::Collections => "collections",
            Operation::Backups => "backups",
            Operation::Files => "files",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level errors.
///
/// These are reported after the transport's own retries are exhausted and
/// are never retried again by the client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The auth or refresh endpoint answered with a non-2xx status.
    #[error("auth endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The auth or refresh endpoint could not be reached.
    #[error("auth endpoint unreachable: {0}")]
    Unreachable(TransportError),

    /// The auth response could not be decoded.
    #[error("malformed auth response: {reason}")]
    MalformedResponse { reason: String },

    /// The auth response carried no token.
    #[error("auth response contained no token")]
    MissingToken,
}

/// A non-2xx response from a record or resource endpoint.
#[derive(Debug, Clone)]
pub struct ServerError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body, kept for diagnostics.
    pub body: String,
    /// The `message` field of the service's JSON error body, if present.
    pub message: Option<String>,
}

impl ServerError {
    /// Build a server error from a status and raw body.
    ///
    /// An empty body is replaced with the status's reason phrase so the
    /// diagnostic is never blank.
    pub fn new(status: u16, body: impl Into<String>, reason: Option<&str>) -> Self {
        let mut body = body.into();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));

        if body.trim().is_empty() {
            body = reason.unwrap_or("empty response body").to_string();
        }

        Self {
            status,
            body,
            message,
        }
    }

    /// Check if the server rejected the request's credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        match self.message {
            Some(ref message) => write!(f, ": {}", message),
            None => write!(f, ": {}", self.body),
        }
    }
}

impl std::error::Error for ServerError {}

/// A response body that could not be decoded.
#[derive(Debug, Error)]
#[error("can't decode {target}: {source} (body: {excerpt})")]
pub struct DecodeError {
    /// What the body was being decoded into.
    pub target: &'static str,
    /// The underlying JSON error.
    #[source]
    pub source: serde_json::Error,
    /// The leading part of the body.
    pub excerpt: String,
}

impl DecodeError {
    pub fn new(target: &'static str, source: serde_json::Error, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let excerpt = match text.char_indices().nth(BODY_EXCERPT_LEN) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.into_owned(),
        };
        Self {
            target,
            source,
            excerpt,
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// A `{placeholder}` in a path template had no value.
    #[error("unresolved path parameter '{name}' in '{template}'")]
    PathTemplate { template: String, name: String },

    /// The request body could not be serialized to JSON.
    #[error("request body is not serializable: {reason}")]
    Body { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> Error {
        Error::Server(ServerError::new(
            404,
            r#"{"code":404,"message":"The requested resource wasn't found.","data":{}}"#,
            Some("Not Found"),
        ))
    }

    #[test]
    fn server_error_parses_message() {
        let Error::Server(err) = not_found() else {
            panic!("expected server error");
        };
        assert_eq!(
            err.message.as_deref(),
            Some("The requested resource wasn't found.")
        );
        assert!(err.body.contains("\"code\":404"));
    }

    #[test]
    fn server_error_body_never_empty() {
        let err = ServerError::new(404, "", Some("Not Found"));
        assert_eq!(err.body, "Not Found");
        assert!(err.message.is_none());

        let err = ServerError::new(502, "   ", None);
        assert!(!err.body.trim().is_empty());
    }

    #[test]
    fn operation_tag_wraps_server_errors() {
        let err = not_found().in_operation(Operation::Read);
        assert_eq!(err.operation(), Some(Operation::Read));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(matches!(err.root(), Error::Server(_)));
        assert!(err.to_string().starts_with("[read] server error: HTTP 404"));
    }

    #[test]
    fn operation_tag_is_not_applied_twice() {
        let err = not_found()
            .in_operation(Operation::List)
            .in_operation(Operation::FullList);
        assert_eq!(err.operation(), Some(Operation::List));
    }

    #[test]
    fn auth_errors_are_not_tagged() {
        let err = Error::Auth(AuthError::MissingToken).in_operation(Operation::Create);
        assert!(err.operation().is_none());
        assert!(err.is_auth_error());
    }

    #[test]
    fn unauthorized_server_error_counts_as_auth_error() {
        let err = Error::Server(ServerError::new(401, "", Some("Unauthorized")))
            .in_operation(Operation::Update);
        assert!(err.is_auth_error());
    }

    #[test]
    fn decode_error_truncates_long_bodies() {
        let body = "x".repeat(BODY_EXCERPT_LEN * 2);
        let source = serde_json::from_str::<serde_json::Value>(&body).unwrap_err();
        let err = DecodeError::new("record", source, body.as_bytes());
        assert_eq!(err.excerpt.len(), BODY_EXCERPT_LEN + 3);
        assert!(err.excerpt.ends_with("..."));
    }
}

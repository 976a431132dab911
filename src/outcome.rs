//! The uniform tagged outcome value returned by every core operation.
//!
//! Every layer (repositories, controllers, HTTP adapter) communicates through
//! this one type. Expected business failures are values, never panics or
//! propagated faults; each controller method converts anything unexpected
//! into an `Exception` outcome at its outer boundary.

use serde_json::{Value, json};
use std::fmt;

/// Symbolic failure category. The identifier string is a stable contract for
/// client-side branching, independent of the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RequiredField,
    RequiredFieldException,
    InvalidField,
    InexistentEntry,
    DuplicatedEntry,
    WrongInfo,
    IncorrectPassword,
    Exception,
    /// Used by substitute fakes in tests to inject repository failures.
    Mock,
}

impl FailureKind {
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::RequiredField => "RequiredField",
            Self::RequiredFieldException => "RequiredFieldException",
            Self::InvalidField => "InvalidField",
            Self::InexistentEntry => "InexistentEntry",
            Self::DuplicatedEntry => "DuplicatedEntry",
            Self::WrongInfo => "WrongInfo",
            Self::IncorrectPassword => "IncorrectPassword",
            Self::Exception => "Exception",
            Self::Mock => "MockError",
        }
    }

    /// Whether the failure is surfaced as an exception (unexpected fault)
    /// rather than a plain business error.
    #[must_use]
    pub const fn is_exception(self) -> bool {
        matches!(self, Self::RequiredFieldException | Self::Exception)
    }
}

/// Tagged success-or-failure value. Implemented as a sum type so handling is
/// exhaustive at compile time, unlike the class hierarchy it replaces.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success {
        data: Option<Value>,
        message: Option<String>,
        code: u16,
    },
    Failure {
        kind: FailureKind,
        code: u16,
        message: String,
    },
}

impl Outcome {
    /// Success with the default 200 code, used for creates and mutations.
    pub fn success(data: impl Into<Option<Value>>, message: impl Into<String>) -> Self {
        Self::Success {
            data: data.into(),
            message: Some(message.into()),
            code: 200,
        }
    }

    /// Success with code 201, used by read paths to mean "fetched".
    pub fn fetched(data: impl Into<Option<Value>>, message: impl Into<String>) -> Self {
        Self::Success {
            data: data.into(),
            message: Some(message.into()),
            code: 201,
        }
    }

    /// `"<field> is required."` — a mandatory field was absent (400).
    pub fn required_field(field: &str) -> Self {
        Self::Failure {
            kind: FailureKind::RequiredField,
            code: 400,
            message: format!("{field} is required."),
        }
    }

    /// The request payload itself was absent, which is treated as more severe
    /// than one missing field and maps to 500.
    pub fn required_request(field: &str) -> Self {
        Self::Failure {
            kind: FailureKind::RequiredFieldException,
            code: 500,
            message: format!("{field} is required."),
        }
    }

    /// A field was present but failed a format or length rule (402).
    pub fn invalid_field(field: &str, reason: Option<&str>) -> Self {
        let message = match reason {
            Some(reason) => format!("{field} {reason}"),
            None => format!("{field} is invalid."),
        };
        Self::Failure {
            kind: FailureKind::InvalidField,
            code: 402,
            message,
        }
    }

    pub fn inexistent_entry(entity: &str) -> Self {
        Self::Failure {
            kind: FailureKind::InexistentEntry,
            code: 404,
            message: format!("{entity} does not exist."),
        }
    }

    pub fn duplicated_entry(entity: &str) -> Self {
        Self::Failure {
            kind: FailureKind::DuplicatedEntry,
            code: 401,
            message: format!("{entity} already exists."),
        }
    }

    /// Supplied identifying data does not correspond to the entity's actual
    /// owner. Distinct from "not found".
    pub fn wrong_info(field: &str) -> Self {
        Self::Failure {
            kind: FailureKind::WrongInfo,
            code: 402,
            message: format!("{field} is wrong."),
        }
    }

    #[must_use]
    pub fn incorrect_password() -> Self {
        Self::Failure {
            kind: FailureKind::IncorrectPassword,
            code: 402,
            message: "Incorrect password.".to_string(),
        }
    }

    /// Converts an unexpected fault caught at a controller boundary.
    pub fn exception(err: impl fmt::Display) -> Self {
        Self::exception_with_code(err.to_string(), 500)
    }

    #[must_use]
    pub fn exception_with_code(message: String, code: u16) -> Self {
        Self::Failure {
            kind: FailureKind::Exception,
            code,
            message,
        }
    }

    #[must_use]
    pub fn mock_error(message: &str) -> Self {
        Self::Failure {
            kind: FailureKind::Mock,
            code: 400,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Success { code, .. } | Self::Failure { code, .. } => *code,
        }
    }

    /// Symbolic tag of the failure, or `None` for successes.
    #[must_use]
    pub const fn identifier(&self) -> Option<&'static str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(kind.identifier()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } => message.as_deref(),
            Self::Failure { message, .. } => Some(message),
        }
    }

    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => data.as_ref(),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Success { data, .. } => data,
            Self::Failure { .. } => None,
        }
    }

    /// Adds call-site context to the message when a downstream controller
    /// passes an inner failure through. The kind and code are never masked.
    #[must_use]
    pub fn with_message_prefix(self, prefix: &str) -> Self {
        match self {
            Self::Success {
                data,
                message,
                code,
            } => Self::Success {
                data,
                message: message.map(|m| format!("{prefix}{m}")),
                code,
            },
            Self::Failure {
                kind,
                code,
                message,
            } => Self::Failure {
                kind,
                code,
                message: format!("{prefix}{message}"),
            },
        }
    }

    /// Wire shape rendered by the HTTP adapter:
    /// `{data, message, ok, exception, identifier}`.
    #[must_use]
    pub fn envelope(&self) -> Value {
        match self {
            Self::Success {
                data, message, ..
            } => json!({
                "data": data,
                "message": message,
                "ok": true,
                "exception": false,
                "identifier": Value::Null,
            }),
            Self::Failure {
                kind, message, ..
            } => json!({
                "data": Value::Null,
                "message": message,
                "ok": false,
                "exception": kind.is_exception(),
                "identifier": kind.identifier(),
            }),
        }
    }
}

//! Error types for listing and decoding grain state blobs.

use thiserror::Error;

/// Classification of a storage service failure.
///
/// Codes mirror the `x-ms-error-code` values returned by Azure Blob Storage
/// for the handful of failures a listing can run into. Anything the service
/// reports that is not listed here lands in [`ErrorCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AuthenticationFailed,
    AuthorizationFailure,
    AuthorizationPermissionMismatch,
    ContainerNotFound,
    ResourceNotFound,
    InvalidQueryParameterValue,
    ServerBusy,
    OperationTimedOut,
    InternalError,
    /// The request never produced a service response (DNS, TCP, TLS, ...).
    Transport,
    /// The service answered but the body could not be understood.
    InvalidResponse,
    Other,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthenticationFailed => "AuthenticationFailed",
            ErrorCode::AuthorizationFailure => "AuthorizationFailure",
            ErrorCode::AuthorizationPermissionMismatch => "AuthorizationPermissionMismatch",
            ErrorCode::ContainerNotFound => "ContainerNotFound",
            ErrorCode::ResourceNotFound => "ResourceNotFound",
            ErrorCode::InvalidQueryParameterValue => "InvalidQueryParameterValue",
            ErrorCode::ServerBusy => "ServerBusy",
            ErrorCode::OperationTimedOut => "OperationTimedOut",
            ErrorCode::InternalError => "InternalError",
            ErrorCode::Transport => "Transport",
            ErrorCode::InvalidResponse => "InvalidResponse",
            ErrorCode::Other => "Other",
        }
    }

    /// Parses a service error code, falling back to [`ErrorCode::Other`].
    pub fn from_service_code(code: &str) -> Self {
        match code {
            "AuthenticationFailed" | "InvalidAuthenticationInfo" => ErrorCode::AuthenticationFailed,
            "AuthorizationFailure" => ErrorCode::AuthorizationFailure,
            "AuthorizationPermissionMismatch" => ErrorCode::AuthorizationPermissionMismatch,
            "ContainerNotFound" => ErrorCode::ContainerNotFound,
            "ResourceNotFound" => ErrorCode::ResourceNotFound,
            "InvalidQueryParameterValue" => ErrorCode::InvalidQueryParameterValue,
            "ServerBusy" => ErrorCode::ServerBusy,
            "OperationTimedOut" => ErrorCode::OperationTimedOut,
            "InternalError" => ErrorCode::InternalError,
            _ => ErrorCode::Other,
        }
    }

    /// Returns the default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::AuthenticationFailed => {
                "Server failed to authenticate the request. Make sure the value of the \
                 Authorization header is formed correctly including the signature."
            }
            ErrorCode::AuthorizationFailure => {
                "This request is not authorized to perform this operation."
            }
            ErrorCode::AuthorizationPermissionMismatch => {
                "This request is not authorized to perform this operation using this permission."
            }
            ErrorCode::ContainerNotFound => "The specified container does not exist.",
            ErrorCode::ResourceNotFound => "The specified resource does not exist.",
            ErrorCode::ServerBusy => "The server is currently unable to receive requests.",
            ErrorCode::InternalError => "The server encountered an internal error.",
            ErrorCode::Transport => "The storage service could not be reached.",
            ErrorCode::InvalidResponse => "The storage service returned an unreadable response.",
            _ => "An error occurred while listing blobs.",
        }
    }
}

/// Failure reported by the storage collaborator while listing blobs.
#[derive(Debug, Error)]
#[error("{}: {message}", .code.as_str())]
pub struct StorageError {
    pub code: ErrorCode,
    pub message: String,
}

impl StorageError {
    /// Creates a new storage error with the given code and default message.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.default_message().to_string(),
            code,
        }
    }

    /// Creates a new storage error with a custom message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<azure_core::Error> for StorageError {
    fn from(err: azure_core::Error) -> Self {
        use azure_core::error::ErrorKind;

        let code = match err.kind() {
            ErrorKind::HttpResponse { error_code, .. } => error_code
                .as_deref()
                .map(ErrorCode::from_service_code)
                .unwrap_or(ErrorCode::Other),
            ErrorKind::Io => ErrorCode::Transport,
            ErrorKind::DataConversion => ErrorCode::InvalidResponse,
            ErrorKind::Credential => ErrorCode::AuthenticationFailed,
            _ => ErrorCode::Other,
        };

        StorageError::with_message(code, err.to_string())
    }
}

/// Errors raised by the lister.
#[derive(Debug, Error)]
pub enum ListerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid settings file: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("invalid connection string: {0}")]
    ConnectionString(String),

    #[error("invalid grain registration: {0}")]
    Registry(String),

    #[error("invalid blob name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<azure_core::Error> for ListerError {
    fn from(err: azure_core::Error) -> Self {
        ListerError::Storage(err.into())
    }
}

/// Result type alias for lister operations.
pub type ListerResult<T> = Result<T, ListerError>;

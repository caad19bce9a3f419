//! Error taxonomy for credential rotation and validity checks.
//!
//! Every variant is terminal: `main` prints it and exits with status 1.

use std::{io, path::PathBuf};

/// Boxed remote error, kept as the `source` of the wrapping variant.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),

    #[error("could not determine the current user's home directory")]
    HomeResolution,

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to list MFA devices for the source profile")]
    MfaDeviceLookup(#[source] BoxError),

    #[error("no MFA devices configured")]
    NoMfaDevice,

    #[error("failed to exchange the MFA code for a session token")]
    TokenExchange(#[source] BoxError),

    #[error("failed to access {}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no mfa_expiration recorded for profile '{profile}'")]
    MissingExpiration { profile: String },

    #[error("invalid mfa_expiration '{value}'")]
    TimestampFormat {
        value: String,
        #[source]
        source: BoxError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

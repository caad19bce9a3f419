use std::fmt;

use aws_smithy_types::{DateTime, date_time::Format};
use log::debug;

use crate::{
    error::{Error, Result},
    paths::ProfilePaths,
    profile_file::{ProfileFile, config_section},
};

pub const ACCESS_KEY_ID: &str = "aws_access_key_id";
pub const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
pub const SESSION_TOKEN: &str = "aws_session_token";
pub const MFA_EXPIRATION: &str = "mfa_expiration";

/// Temporary credentials returned by a session token exchange.
#[derive(Clone, PartialEq)]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime,
}

impl SessionCredentials {
    /// Expiration as RFC 3339 UTC, whole seconds.
    pub fn expiration_rfc3339(&self) -> Result<String> {
        format_expiration(self.expiration)
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Formats `expiration` the way `mfa_expiration` is stored, e.g. `2024-05-01T12:00:00Z`.
///
/// # Errors
///
/// Returns [`Error::TimestampFormat`] for instants RFC 3339 cannot express
/// (outside years 0001 to 9999).
pub fn format_expiration(expiration: DateTime) -> Result<String> {
    DateTime::from_secs(expiration.secs())
        .fmt(Format::DateTime)
        .map_err(|source| Error::TimestampFormat {
            value: expiration.secs().to_string(),
            source: Box::new(source),
        })
}

/// Persists a rotated credential set.
///
/// The destination section of the credentials file receives the three
/// credential keys and is saved first; the source profile's `mfa_expiration`
/// in the config file is saved second. The two writes are independent, so a
/// failure on the second leaves fresh credentials next to a stale expiration.
///
/// # Arguments
///
/// * `paths` - Where the shared credentials and config files live
/// * `credentials` - The set returned by the session token exchange
/// * `source` - Profile whose `[profile <source>]` section gets `mfa_expiration`
/// * `destination` - Credentials file section that receives the temporary keys
///
/// # Errors
///
/// * [`Error::HomeResolution`] if a file location cannot be determined
/// * [`Error::Persistence`] if either file cannot be read or written
/// * [`Error::Parse`] if either file is not valid INI
/// * [`Error::TimestampFormat`] if the expiration cannot be rendered as RFC 3339
///
/// Both files are loaded and the expiration is formatted before anything is
/// written, so these failures leave both files untouched.
pub async fn write_credentials(
    paths: &impl ProfilePaths,
    credentials: &SessionCredentials,
    source: &str,
    destination: &str,
) -> Result<()> {
    let mut credentials_file = ProfileFile::load(paths.credentials_path()?).await?;
    let mut config_file = ProfileFile::load(paths.config_path()?).await?;
    let expiration = credentials.expiration_rfc3339()?;

    credentials_file.set(destination, ACCESS_KEY_ID, &credentials.access_key_id);
    credentials_file.set(destination, SECRET_ACCESS_KEY, &credentials.secret_access_key);
    credentials_file.set(destination, SESSION_TOKEN, &credentials.session_token);
    credentials_file.save().await?;
    debug!("Wrote [{destination}] to {}", credentials_file.path().display());

    config_file.set(&config_section(source), MFA_EXPIRATION, &expiration);
    config_file.save().await?;
    debug!("Recorded expiration {expiration} for profile {source}");

    Ok(())
}

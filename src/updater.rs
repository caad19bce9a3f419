//! Rotate mode.
//!
//! A rotation resolves the MFA device, exchanges the code for a session token
//! and writes the result, in that order. Nothing touches disk until the token
//! exchange has succeeded; after that the credentials file is written before
//! the config file.
//!
//! ```ini
//! # credentials
//! [default]                        # source: long-lived keys, read by the SDK
//! aws_access_key_id=AKIA...
//! aws_secret_access_key=...
//!
//! [mfa]                            # destination: rewritten on every rotation
//! aws_access_key_id=ASIA...
//! aws_secret_access_key=...
//! aws_session_token=...
//!
//! # config
//! [profile default]
//! mfa_expiration=2024-05-01T12:00:00Z
//!
//! [profile mfa]
//! mfa_serial=arn:aws:iam::123456789012:mfa/alice   # optional
//! ```

use log::info;

use crate::{
    client::SessionTokens,
    credentials::{SessionCredentials, write_credentials},
    error::Result,
    mfa::{MfaDevices, resolve_mfa_serial},
    paths::ProfilePaths,
};

/// Everything a single rotation needs, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    pub source: String,
    pub destination: String,
    pub code: String,
    /// Session lifetime in seconds; `None` leaves it to the service default.
    pub duration: Option<i32>,
}

pub struct CredentialRotator<'a, P, C> {
    paths: &'a P,
    client: &'a C,
}

impl<'a, P, C> CredentialRotator<'a, P, C>
where
    P: ProfilePaths + Sync,
    C: MfaDevices + SessionTokens + Sync,
{
    pub fn new(paths: &'a P, client: &'a C) -> Self {
        Self { paths, client }
    }

    /// Runs one rotation end to end.
    ///
    /// # Returns
    ///
    /// The credential set that was written, so callers can report on it.
    ///
    /// # Errors
    ///
    /// Any error from device resolution, the token exchange or
    /// [`write_credentials`]. Failures before the write leave both files as
    /// they were.
    pub async fn rotate(&self, rotation: &Rotation) -> Result<SessionCredentials> {
        let serial = resolve_mfa_serial(self.paths, self.client, &rotation.destination).await?;

        info!("Requesting session token for profile {}", rotation.source);
        let credentials = self
            .client
            .get_session_token(&serial, &rotation.code, rotation.duration)
            .await?;

        write_credentials(
            self.paths,
            &credentials,
            &rotation.source,
            &rotation.destination,
        )
        .await?;

        info!("Access token updated for {}", rotation.destination);
        Ok(credentials)
    }
}

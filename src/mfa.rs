//! MFA device resolution.

use async_trait::async_trait;
use log::info;

use crate::{
    error::{Error, Result},
    paths::ProfilePaths,
    profile_file::{ProfileFile, config_section},
};

pub const MFA_SERIAL: &str = "mfa_serial";

/// Lists the MFA devices registered to the caller identity.
#[async_trait]
pub trait MfaDevices {
    /// Serial numbers in the order the service returns them.
    async fn list_mfa_devices(&self) -> Result<Vec<String>>;
}

/// Picks the MFA device serial for a rotation into `destination`.
///
/// A `mfa_serial` under `[profile <destination>]` in the config file wins and
/// is returned as-is. Otherwise the first device the service lists is used.
///
/// # Arguments
///
/// * `paths` - Locates the config file holding an optional `mfa_serial`
/// * `devices` - Device listing authenticated as the source profile
/// * `destination` - Profile whose config section may pin the device
///
/// # Errors
///
/// * [`Error::Persistence`] or [`Error::Parse`] if the config file cannot be loaded
/// * [`Error::MfaDeviceLookup`] if the device listing call fails
/// * [`Error::NoMfaDevice`] if no serial is configured and none is registered
pub async fn resolve_mfa_serial(
    paths: &impl ProfilePaths,
    devices: &impl MfaDevices,
    destination: &str,
) -> Result<String> {
    let config = ProfileFile::load(paths.config_path()?).await?;

    let serial = match config.get(&config_section(destination), MFA_SERIAL) {
        Some(serial) => serial,
        None => devices
            .list_mfa_devices()
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoMfaDevice)?,
    };

    info!("Using device {serial}");
    Ok(serial)
}

//! AWS-backed device listing and session token exchange.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig, profile::ProfileFileCredentialsProvider};
use aws_sdk_sts::error::DisplayErrorContext;
use log::debug;

use crate::{
    credentials::SessionCredentials,
    error::{Error, Result},
    mfa::MfaDevices,
};

/// IAM and STS are served from global endpoints; any region resolves them.
const FALLBACK_REGION: &str = "us-east-1";

/// Exchanges an MFA code for temporary credentials.
#[async_trait]
pub trait SessionTokens {
    async fn get_session_token(
        &self,
        serial: &str,
        code: &str,
        duration: Option<i32>,
    ) -> Result<SessionCredentials>;
}

/// Clients authenticated with the source profile's long-lived keys.
pub struct AwsClient {
    iam: aws_sdk_iam::Client,
    sts: aws_sdk_sts::Client,
}

impl AwsClient {
    pub async fn for_profile(profile: &str) -> Self {
        let config = load_config(profile).await;
        Self {
            iam: aws_sdk_iam::Client::new(&config),
            sts: aws_sdk_sts::Client::new(&config),
        }
    }
}

/// Credentials come from the named profile in the shared files only; the
/// `AWS_ACCESS_KEY_ID` family of environment variables is not consulted.
async fn load_config(profile: &str) -> SdkConfig {
    let credentials = || {
        ProfileFileCredentialsProvider::builder()
            .profile_name(profile)
            .build()
    };

    let loaded = aws_config::defaults(BehaviorVersion::latest())
        .profile_name(profile)
        .credentials_provider(credentials())
        .load()
        .await;

    match loaded.region() {
        Some(region) => {
            debug!("Using region: {region}");
            loaded
        }
        None => {
            debug!("No region configured, using {FALLBACK_REGION}");
            aws_config::defaults(BehaviorVersion::latest())
                .profile_name(profile)
                .credentials_provider(credentials())
                .region(Region::new(FALLBACK_REGION))
                .load()
                .await
        }
    }
}

#[async_trait]
impl MfaDevices for AwsClient {
    async fn list_mfa_devices(&self) -> Result<Vec<String>> {
        let output = self
            .iam
            .list_mfa_devices()
            .send()
            .await
            .map_err(|e| Error::MfaDeviceLookup(DisplayErrorContext(e).to_string().into()))?;

        Ok(output
            .mfa_devices()
            .iter()
            .map(|device| device.serial_number().to_string())
            .collect())
    }
}

#[async_trait]
impl SessionTokens for AwsClient {
    async fn get_session_token(
        &self,
        serial: &str,
        code: &str,
        duration: Option<i32>,
    ) -> Result<SessionCredentials> {
        let output = self
            .sts
            .get_session_token()
            .set_duration_seconds(duration)
            .serial_number(serial)
            .token_code(code)
            .send()
            .await
            .map_err(|e| Error::TokenExchange(DisplayErrorContext(e).to_string().into()))?;

        let credentials = output
            .credentials()
            .ok_or_else(|| Error::TokenExchange("no credentials returned".into()))?;

        Ok(SessionCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration: *credentials.expiration(),
        })
    }
}

//! Remaining lifetime of a previously rotated session token.

use std::{process::ExitCode, time::SystemTime};

use aws_smithy_types::{DateTime, date_time::Format};

use crate::{
    credentials::MFA_EXPIRATION,
    error::{Error, Result},
    paths::ProfilePaths,
    profile_file::{ProfileFile, config_section},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Seconds until expiry.
    Remaining(i64),
    /// Seconds since expiry.
    Expired(i64),
}

/// Reads `mfa_expiration` for `profile` and compares it with the current time.
///
/// # Returns
///
/// * `Validity::Remaining` - Seconds left, zero included
/// * `Validity::Expired` - Seconds since the token expired
///
/// # Errors
///
/// * [`Error::Persistence`] or [`Error::Parse`] if the config file cannot be loaded
/// * [`Error::MissingExpiration`] if `[profile <profile>]` has no `mfa_expiration`
/// * [`Error::TimestampFormat`] if the stored value is not RFC 3339
pub async fn check_validity(paths: &impl ProfilePaths, profile: &str) -> Result<Validity> {
    check_validity_at(paths, profile, DateTime::from(SystemTime::now())).await
}

pub async fn check_validity_at(
    paths: &impl ProfilePaths,
    profile: &str,
    now: DateTime,
) -> Result<Validity> {
    let config = ProfileFile::load(paths.config_path()?).await?;
    let value = config
        .get(&config_section(profile), MFA_EXPIRATION)
        .ok_or_else(|| Error::MissingExpiration {
            profile: profile.to_string(),
        })?;

    let expiration = parse_expiration(&value)?;
    Ok(time_left(expiration, now))
}

/// RFC 3339, either `Z` or a numeric offset.
pub fn parse_expiration(value: &str) -> Result<DateTime> {
    DateTime::from_str(value, Format::DateTime)
        .or_else(|_| DateTime::from_str(value, Format::DateTimeWithOffset))
        .map_err(|source| Error::TimestampFormat {
            value: value.to_string(),
            source: Box::new(source),
        })
}

impl Validity {
    /// Expired tokens exit with status 1.
    pub fn exit_code(self) -> ExitCode {
        match self {
            Validity::Remaining(_) => ExitCode::SUCCESS,
            Validity::Expired(_) => ExitCode::FAILURE,
        }
    }
}

/// Difference at one-second resolution; an expiration equal to `now` is still valid.
pub fn time_left(expiration: DateTime, now: DateTime) -> Validity {
    let remaining = expiration.secs() - now.secs();
    if remaining < 0 {
        Validity::Expired(-remaining)
    } else {
        Validity::Remaining(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::FixedPaths;
    use tempfile::tempdir;

    const NOW: i64 = 1_714_564_800;

    fn paths_with_config(dir: &std::path::Path, config: &str) -> FixedPaths {
        let paths = FixedPaths::in_dir(dir);
        std::fs::write(&paths.config, config).unwrap();
        paths
    }

    #[tokio::test]
    async fn reports_remaining_seconds() {
        let dir = tempdir().expect("temp dir created");
        let paths = paths_with_config(
            dir.path(),
            "[profile default]\nmfa_expiration = 2024-05-01T12:01:40Z\n",
        );

        let validity = check_validity_at(&paths, "default", DateTime::from_secs(NOW))
            .await
            .unwrap();
        assert_eq!(validity, Validity::Remaining(100));
    }

    #[tokio::test]
    async fn reports_expiry() {
        let dir = tempdir().expect("temp dir created");
        let paths = paths_with_config(
            dir.path(),
            "[profile default]\nmfa_expiration = 2024-05-01T11:59:00Z\n",
        );

        let validity = check_validity_at(&paths, "default", DateTime::from_secs(NOW))
            .await
            .unwrap();
        assert_eq!(validity, Validity::Expired(60));
    }

    #[tokio::test]
    async fn future_expiration_against_the_clock() {
        let dir = tempdir().expect("temp dir created");
        let expiration = DateTime::from_secs(DateTime::from(SystemTime::now()).secs() + 100)
            .fmt(Format::DateTime)
            .unwrap();
        let paths = paths_with_config(
            dir.path(),
            &format!("[profile default]\nmfa_expiration = {expiration}\n"),
        );

        match check_validity(&paths, "default").await.unwrap() {
            Validity::Remaining(secs) => assert!((98..=100).contains(&secs), "{secs}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_expiration_is_distinct_from_malformed() {
        let dir = tempdir().expect("temp dir created");
        let paths = paths_with_config(
            dir.path(),
            "[profile default]\nregion = us-east-1\n\n[profile broken]\nmfa_expiration = tomorrow\n",
        );

        let missing = check_validity(&paths, "default").await.unwrap_err();
        assert!(matches!(missing, Error::MissingExpiration { ref profile } if profile == "default"));

        let malformed = check_validity(&paths, "broken").await.unwrap_err();
        assert!(matches!(malformed, Error::TimestampFormat { ref value, .. } if value == "tomorrow"));
    }

    #[test]
    fn accepts_numeric_offsets() {
        let parsed = parse_expiration("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(parsed.secs(), NOW);
    }

    #[test]
    fn expiring_now_is_still_valid() {
        let now = DateTime::from_secs(NOW);
        assert_eq!(time_left(now, now), Validity::Remaining(0));
        assert_eq!(time_left(DateTime::from_secs(NOW - 1), now), Validity::Expired(1));
    }

    #[test]
    fn only_expired_tokens_fail_the_process() {
        let status = |validity: Validity| format!("{:?}", validity.exit_code());
        let success = format!("{:?}", ExitCode::SUCCESS);
        let failure = format!("{:?}", ExitCode::FAILURE);

        assert_eq!(status(Validity::Remaining(100)), success);
        assert_eq!(status(Validity::Remaining(0)), success);
        assert_eq!(status(Validity::Expired(1)), failure);
    }
}

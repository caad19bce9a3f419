//! Locations of the shared AWS credentials and config files.

use std::{env, path::PathBuf};

use crate::error::{Error, Result};

pub const CREDENTIALS_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";
pub const CONFIG_ENV: &str = "AWS_CONFIG_FILE";

/// Resolves where the two shared profile files live.
pub trait ProfilePaths {
    fn credentials_path(&self) -> Result<PathBuf>;
    fn config_path(&self) -> Result<PathBuf>;
}

/// Environment overrides first, then `~/.aws/`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvPaths;

impl ProfilePaths for EnvPaths {
    fn credentials_path(&self) -> Result<PathBuf> {
        resolve(env::var(CREDENTIALS_ENV).ok(), dirs::home_dir(), "credentials")
    }

    fn config_path(&self) -> Result<PathBuf> {
        resolve(env::var(CONFIG_ENV).ok(), dirs::home_dir(), "config")
    }
}

/// An override that is set but empty counts as unset.
pub fn resolve(overridden: Option<String>, home: Option<PathBuf>, file: &str) -> Result<PathBuf> {
    match overridden.filter(|value| !value.is_empty()) {
        Some(path) => Ok(PathBuf::from(path)),
        None => home
            .map(|home| home.join(".aws").join(file))
            .ok_or(Error::HomeResolution),
    }
}

/// Fixed file locations, used to point operations at temporary files.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedPaths {
    pub credentials: PathBuf,
    pub config: PathBuf,
}

#[cfg(test)]
impl FixedPaths {
    pub fn in_dir(dir: &std::path::Path) -> Self {
        Self {
            credentials: dir.join("credentials"),
            config: dir.join("config"),
        }
    }
}

#[cfg(test)]
impl ProfilePaths for FixedPaths {
    fn credentials_path(&self) -> Result<PathBuf> {
        Ok(self.credentials.clone())
    }

    fn config_path(&self) -> Result<PathBuf> {
        Ok(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_home() {
        let path = resolve(
            Some("/custom/path/credentials".to_string()),
            Some(PathBuf::from("/home/alice")),
            "credentials",
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/custom/path/credentials"));
    }

    #[test]
    fn empty_override_falls_back_to_home() {
        let path = resolve(Some(String::new()), Some(PathBuf::from("/home/alice")), "config").unwrap();
        assert_eq!(path, PathBuf::from("/home/alice/.aws/config"));
    }

    #[test]
    fn missing_home_is_an_error() {
        let err = resolve(None, None, "credentials").unwrap_err();
        assert!(matches!(err, Error::HomeResolution));
    }

    #[test]
    fn fixed_paths_point_into_dir() {
        let paths = FixedPaths::in_dir(std::path::Path::new("/tmp/x"));
        assert_eq!(paths.credentials_path().unwrap(), PathBuf::from("/tmp/x/credentials"));
        assert_eq!(paths.config_path().unwrap(), PathBuf::from("/tmp/x/config"));
    }
}

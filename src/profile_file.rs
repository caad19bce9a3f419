//! Read-modify-write access to the shared AWS INI files.
//!
//! Both files are parsed with `configparser` in case-sensitive mode so profile
//! names round-trip exactly. Insertion order is kept (the `indexmap` feature),
//! which means a rewrite only touches the keys that were set. Values are taken
//! verbatim: `#` and `;` only start a comment at the beginning of a line, and
//! indented lines continue the previous key, as in nested `s3 =` settings.
//! Whole-line comments are not carried over on rewrite.
//!
//! There is no locking: two concurrent rotations against the same files race,
//! and the last writer wins.

use std::path::{Path, PathBuf};

use configparser::ini::{Ini, IniDefault, WriteOptions};
use log::debug;
use tokio::fs;

use crate::error::{Error, Result};

/// Section holding keys that appear before the first header.
///
/// `configparser` writes its default section without a header, so it must
/// never be a real profile name such as `default`.
const PREAMBLE: &str = "";

/// Indentation for continuation lines of nested values.
const NESTED_INDENT: usize = 4;

fn parser() -> Ini {
    let mut defaults = IniDefault::default();
    defaults.default_section = PREAMBLE.to_string();
    defaults.case_sensitive = true;
    defaults.enable_inline_comments = false;
    defaults.multiline = true;
    Ini::new_from_defaults(defaults)
}

/// Name of a profile's section in the config file.
pub fn config_section(profile: &str) -> String {
    format!("profile {profile}")
}

/// A loaded INI file bound to the path it came from.
pub struct ProfileFile {
    path: PathBuf,
    ini: Ini,
}

impl ProfileFile {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// * [`Error::Persistence`] if the file cannot be read (missing, permissions)
    /// * [`Error::Parse`] if the content is not valid INI, such as a section
    ///   header without its closing bracket
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading {}", path.display());

        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| Error::Persistence {
                path: path.clone(),
                source,
            })?;

        let mut ini = parser();
        ini.read(content).map_err(|message| Error::Parse {
            path: path.clone(),
            message,
        })?;

        Ok(Self { path, ini })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    /// Inserts or overwrites `key`, creating `section` when needed.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.set(section, key, Some(value.to_string()));
    }

    /// Writes the file back as `key=value` lines, one blank line between sections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] when the file cannot be written, for
    /// example because its directory is missing or not writable.
    pub async fn save(&self) -> Result<()> {
        debug!("Writing {}", self.path.display());
        let options = WriteOptions::new_with_params(false, NESTED_INDENT, 1);
        fs::write(&self.path, self.ini.pretty_writes(&options))
            .await
            .map_err(|source| Error::Persistence {
                path: self.path.clone(),
                source,
            })
    }
}

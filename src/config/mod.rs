// ABOUTME: Configuration types and merging for capstan.yml, flags, and env.
// ABOUTME: Resolves deploy inputs with flag > env > file > default precedence.

mod init;
mod retention;

pub use init::init_config;
pub use retention::RetentionPolicy;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ssh::{KeyMaterial, SessionConfig};

pub const CONFIG_FILENAME: &str = "capstan.yml";
pub const CONFIG_FILENAME_ALT: &str = "capstan.yaml";

/// On-disk configuration. Every field is optional; flags and environment
/// variables override anything set here. The private key is never read from
/// this file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub source: Option<PathBuf>,

    #[serde(default)]
    pub destination: Option<String>,

    #[serde(default)]
    pub keep_archive: Option<bool>,

    #[serde(default)]
    pub skip_restart: Option<bool>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Look for a config file in `dir`. The file is optional; `None` means
    /// flags and environment variables must carry every required input.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let candidates = [dir.join(CONFIG_FILENAME), dir.join(CONFIG_FILENAME_ALT)];

        for path in &candidates {
            if path.exists() {
                return Self::load(path).map(Some);
            }
        }

        Ok(None)
    }
}

/// Deploy inputs supplied by the caller, already flattened by the CLI layer
/// (a flag beats its environment variable there). `None` falls through to the
/// config file, then to the built-in default.
#[derive(Debug, Clone, Default)]
pub struct DeployOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub ssh_key: Option<String>,
    pub ssh_key_file: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub destination: Option<String>,
    pub keep_archive: Option<bool>,
    pub skip_restart: Option<bool>,
}

/// Fully resolved deploy inputs. The pipeline consumes these values as-is;
/// all merging and defaulting has already happened.
#[derive(Debug)]
pub struct Settings {
    pub session: SessionConfig,
    pub source: PathBuf,
    pub destination: String,
    pub retention: RetentionPolicy,
    pub restart: bool,
}

impl Settings {
    /// Merge caller overrides with the optional config file.
    ///
    /// Host, source, destination, and the private key are required once
    /// merging is done; port and user fall back to the session defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingInput` naming the first absent required input,
    /// `Error::MissingKey` when neither key form was supplied, or `Error::Io`
    /// if a key file cannot be read.
    pub fn resolve(overrides: DeployOverrides, file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let host = overrides.host.or(file.host).ok_or(Error::MissingInput("host"))?;
        let source = overrides
            .source
            .or(file.source)
            .ok_or(Error::MissingInput("source"))?;
        let destination = overrides
            .destination
            .or(file.destination)
            .ok_or(Error::MissingInput("destination"))?;

        let key = load_key_material(overrides.ssh_key, overrides.ssh_key_file)?;

        let mut session = SessionConfig::new(host, key);
        if let Some(port) = overrides.port.or(file.port) {
            session = session.port(port);
        }
        if let Some(user) = overrides.user.or(file.user) {
            session = session.user(user);
        }

        let keep = overrides
            .keep_archive
            .or(file.keep_archive)
            .unwrap_or(false);
        let skip_restart = overrides
            .skip_restart
            .or(file.skip_restart)
            .unwrap_or(false);

        Ok(Settings {
            session,
            source,
            destination,
            retention: RetentionPolicy::from_keep_flag(keep),
            restart: !skip_restart,
        })
    }
}

/// Key material beats a key file when both are given.
fn load_key_material(blob: Option<String>, file: Option<PathBuf>) -> Result<KeyMaterial> {
    match (blob, file) {
        (Some(pem), _) => Ok(KeyMaterial::new(pem)),
        (None, Some(path)) => {
            let pem = std::fs::read_to_string(&path)?;
            Ok(KeyMaterial::new(pem))
        }
        (None, None) => Err(Error::MissingKey),
    }
}

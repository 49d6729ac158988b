// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates capstan.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# capstan deployment configuration.
# Flags and CAPSTAN_* environment variables override anything set here.
host: server.example.com
port: 22
user: root
source: ./build.tar.gz
destination: /srv/app/

# Keep the uploaded archive after extraction (renamed with a timestamp).
# keep_archive: true

# Skip the dependency reinstall and service reload stage.
# skip_restart: true

# The private key is never read from this file.
# Supply it with CAPSTAN_SSH_KEY or CAPSTAN_SSH_KEY_FILE.
"#;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;

    Ok(())
}

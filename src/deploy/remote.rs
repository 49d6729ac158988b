// ABOUTME: Remote shell command construction for the deployment stages.
// ABOUTME: The only place remote command text is assembled; embedded paths are quoted here.

use chrono::Utc;

use crate::config::RetentionPolicy;
use crate::ssh::sh_quote;

/// Extraction tool expected on the remote host.
pub(crate) const EXTRACTION_TOOL: &str = "tar";

/// Command reading the remote user's home directory.
pub(crate) fn home_probe() -> &'static str {
    r#"printf %s "$HOME""#
}

/// Exit 0 confirms `path` is an existing directory.
pub(crate) fn dir_test(path: &str) -> String {
    format!("test -d {}", sh_quote(path))
}

/// Idempotent recursive directory creation, verbose so each directory
/// actually created streams back to the caller.
pub(crate) fn make_directories(dir: &str) -> String {
    format!("mkdir -pv {}", sh_quote(dir))
}

/// Exit 0 confirms the tool resolves to an executable on the remote PATH.
pub(crate) fn tool_lookup(tool: &str) -> String {
    format!("command -v {}", tool)
}

/// Extraction chained with the retention step as one remote invocation, so a
/// connection drop mid-command leaves a clearly attributable state instead of
/// a silently abandoned archive.
///
/// The archive's single top-level wrapper directory is stripped; entries land
/// directly in the working directory.
pub(crate) fn extract_and_settle(archive: &str, retention: RetentionPolicy) -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
    extract_with_stamp(archive, retention, &stamp)
}

fn extract_with_stamp(archive: &str, retention: RetentionPolicy, stamp: &str) -> String {
    let extract = format!("tar --strip-components=1 -xzf {}", sh_quote(archive));
    match retention {
        RetentionPolicy::Delete => format!("{} && rm -f {}", extract, sh_quote(archive)),
        RetentionPolicy::Keep => {
            let kept = format!("{}.{}", archive, stamp);
            format!("{} && mv {} {}", extract, sh_quote(archive), sh_quote(&kept))
        }
    }
}

/// Dependency reinstall chained into the process-manager reload; an install
/// failure must prevent reloading onto stale dependencies.
pub(crate) fn reinstall_and_reload() -> &'static str {
    "npm install --omit=dev && pm2 reload all"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_directories_quotes_the_path() {
        assert_eq!(
            make_directories("/srv/my app"),
            "mkdir -pv '/srv/my app'"
        );
    }

    #[test]
    fn dir_test_quotes_the_path() {
        assert_eq!(dir_test("/srv/app"), "test -d '/srv/app'");
    }

    #[test]
    fn tool_lookup_uses_command_v() {
        assert_eq!(tool_lookup("tar"), "command -v tar");
    }

    #[test]
    fn home_probe_reads_the_login_environment() {
        assert!(home_probe().contains("$HOME"));
    }

    #[test]
    fn delete_retention_removes_the_archive_after_extraction() {
        assert_eq!(
            extract_with_stamp(
                "/srv/app/build.tar.gz",
                RetentionPolicy::Delete,
                "20240101000000"
            ),
            "tar --strip-components=1 -xzf '/srv/app/build.tar.gz' \
             && rm -f '/srv/app/build.tar.gz'"
        );
    }

    #[test]
    fn keep_retention_renames_with_a_timestamp() {
        assert_eq!(
            extract_with_stamp(
                "/srv/app/build.tar.gz",
                RetentionPolicy::Keep,
                "20240101000000"
            ),
            "tar --strip-components=1 -xzf '/srv/app/build.tar.gz' \
             && mv '/srv/app/build.tar.gz' '/srv/app/build.tar.gz.20240101000000'"
        );
    }

    #[test]
    fn restart_chains_install_before_reload() {
        let command = reinstall_and_reload();
        let install = command.find("npm install").unwrap();
        let reload = command.find("pm2 reload").unwrap();
        assert!(install < reload);
        assert!(command.contains("&&"));
    }
}

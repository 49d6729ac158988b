// ABOUTME: Destination path resolution and the frozen deployment target.
// ABOUTME: Anchors relative destinations at the remote home and splits directory vs file forms.

use std::path::{Path, PathBuf};

use crate::ssh::CommandOps;

use super::error::DeployError;
use super::remote;

/// Whether a remote path turned out to be an existing directory.
///
/// `test -d` polarity: exit 0 means the directory exists. This is the only
/// place that convention is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirProbe {
    Directory,
    NotADirectory,
}

/// The fully resolved deployment target.
///
/// Built exactly once per run by the resolver, read-only afterwards. The
/// destination always names a file by an absolute path (never ends in a
/// separator), and the directory is always its parent.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    source: PathBuf,
    raw_destination: String,
    destination: String,
    destination_dir: String,
}

impl DeploymentTarget {
    /// Local path of the artifact to upload.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The destination exactly as the caller supplied it.
    pub fn raw_destination(&self) -> &str {
        &self.raw_destination
    }

    /// Absolute remote file path the artifact lands at.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Absolute remote directory containing the destination.
    pub fn destination_dir(&self) -> &str {
        &self.destination_dir
    }
}

/// Resolve the raw destination into an absolute file path plus its directory.
///
/// Relative destinations (including `~` forms) are anchored at the remote
/// home directory, probed through the session. A destination names a
/// directory when it ends with a separator, or otherwise when the remote host
/// confirms an existing directory; in both cases the source's file name is
/// appended. Anything else is taken verbatim as the file path.
pub(crate) async fn resolve<R: CommandOps>(
    shell: &R,
    source: &Path,
    raw_destination: &str,
) -> Result<DeploymentTarget, DeployError> {
    let file_name = source_file_name(source)?;

    let absolute = if is_absolute(raw_destination) {
        raw_destination.to_string()
    } else {
        let home = remote_home(shell).await?;
        join_home(&home, raw_destination)
    };

    let treat_as_dir = if raw_destination.ends_with('/') {
        true
    } else {
        dir_probe(shell, &absolute).await? == DirProbe::Directory
    };

    let (destination, destination_dir) = split_destination(&absolute, treat_as_dir, &file_name);

    Ok(DeploymentTarget {
        source: source.to_path_buf(),
        raw_destination: raw_destination.to_string(),
        destination,
        destination_dir,
    })
}

fn is_absolute(raw: &str) -> bool {
    raw.starts_with('/')
}

fn source_file_name(source: &Path) -> Result<String, DeployError> {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            DeployError::Resolution(format!(
                "source path {} has no file name",
                source.display()
            ))
        })
}

/// Probe the remote home directory through the session.
async fn remote_home<R: CommandOps>(shell: &R) -> Result<String, DeployError> {
    let probe = shell
        .probe(remote::home_probe(), None)
        .await
        .map_err(|e| DeployError::Resolution(e.to_string()))?;
    if !probe.success() {
        return Err(DeployError::Resolution(format!(
            "home directory probe exited with code {}",
            probe.exit_code
        )));
    }

    let home = probe.stdout.trim();
    if !home.starts_with('/') {
        return Err(DeployError::Resolution(format!(
            "home directory probe returned {:?}",
            home
        )));
    }

    let trimmed = home.trim_end_matches('/');
    Ok(if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    })
}

/// Anchor a relative destination at the remote home directory.
/// `~` prefixes are normalized into the same home-relative form.
fn join_home(home: &str, raw: &str) -> String {
    let rel = match raw {
        "~" => "",
        _ => raw.strip_prefix("~/").unwrap_or(raw),
    };
    let rel = rel.trim_start_matches('/');
    if rel.is_empty() {
        home.to_string()
    } else if home == "/" {
        format!("/{}", rel)
    } else {
        format!("{}/{}", home, rel)
    }
}

/// Ask the remote host whether `path` is an existing directory.
async fn dir_probe<R: CommandOps>(shell: &R, path: &str) -> Result<DirProbe, DeployError> {
    let probe = shell
        .probe(&remote::dir_test(path), None)
        .await
        .map_err(|e| DeployError::Resolution(e.to_string()))?;
    Ok(if probe.success() {
        DirProbe::Directory
    } else {
        DirProbe::NotADirectory
    })
}

/// Split an absolute destination into the file path and its directory.
///
/// Directory destinations take the source file name; file destinations are
/// used verbatim. The result never ends in a separator.
fn split_destination(absolute: &str, treat_as_dir: bool, file_name: &str) -> (String, String) {
    if treat_as_dir {
        let dir = normalize_dir(absolute);
        let destination = if dir == "/" {
            format!("/{}", file_name)
        } else {
            format!("{}/{}", dir, file_name)
        };
        (destination, dir)
    } else {
        let destination = absolute.to_string();
        let dir = parent_dir(&destination);
        (destination, dir)
    }
}

fn normalize_dir(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(pos) => path[..pos].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod home_anchoring {
        use super::*;

        #[test]
        fn relative_paths_land_under_home() {
            assert_eq!(
                join_home("/home/deployer", "deploys/site"),
                "/home/deployer/deploys/site"
            );
        }

        #[test]
        fn tilde_slash_prefix_is_normalized() {
            assert_eq!(join_home("/home/deployer", "~/apps"), "/home/deployer/apps");
        }

        #[test]
        fn bare_tilde_means_home_itself() {
            assert_eq!(join_home("/home/deployer", "~"), "/home/deployer");
        }

        #[test]
        fn leading_separators_do_not_double_up() {
            assert_eq!(join_home("/root", "app"), "/root/app");
        }

        #[test]
        fn root_home_does_not_double_the_separator() {
            assert_eq!(join_home("/", "deploys/site"), "/deploys/site");
        }
    }

    mod splitting {
        use super::*;

        #[test]
        fn trailing_separator_joins_the_source_name() {
            let (dest, dir) = split_destination("/srv/app/", true, "build.tar.gz");
            assert_eq!(dest, "/srv/app/build.tar.gz");
            assert_eq!(dir, "/srv/app");
        }

        #[test]
        fn confirmed_directory_joins_the_source_name() {
            let (dest, dir) = split_destination("/srv/app", true, "build.tar.gz");
            assert_eq!(dest, "/srv/app/build.tar.gz");
            assert_eq!(dir, "/srv/app");
        }

        #[test]
        fn file_destination_is_used_verbatim() {
            let (dest, dir) = split_destination("/srv/app/release.tar.gz", false, "build.tar.gz");
            assert_eq!(dest, "/srv/app/release.tar.gz");
            assert_eq!(dir, "/srv/app");
        }

        #[test]
        fn parent_of_a_top_level_file_is_root() {
            let (dest, dir) = split_destination("/build.tar.gz", false, "build.tar.gz");
            assert_eq!(dest, "/build.tar.gz");
            assert_eq!(dir, "/");
        }

        #[test]
        fn repeated_trailing_separators_collapse() {
            let (dest, dir) = split_destination("/srv/app//", true, "build.tar.gz");
            assert_eq!(dest, "/srv/app/build.tar.gz");
            assert_eq!(dir, "/srv/app");
        }

        #[test]
        fn root_directory_destination_does_not_double_the_separator() {
            let (dest, dir) = split_destination("/", true, "build.tar.gz");
            assert_eq!(dest, "/build.tar.gz");
            assert_eq!(dir, "/");
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn directory_destinations_always_join_the_file_name(
                dir in "(/[a-z][a-z0-9]{0,8}){1,4}",
                name in "[a-z][a-z0-9]{0,8}\\.tar\\.gz",
            ) {
                let raw = format!("{}/", dir);
                let (dest, parent) = split_destination(&raw, true, &name);
                prop_assert_eq!(dest.clone(), format!("{}/{}", dir, name));
                prop_assert_eq!(parent, dir);
                prop_assert!(!dest.ends_with('/'));
            }

            #[test]
            fn relative_destinations_are_home_prefixed_exactly_once(
                rel in "[a-z][a-z0-9]{0,8}(/[a-z][a-z0-9]{0,8}){0,3}",
            ) {
                // Uppercase home cannot collide with the lowercase segments,
                // so a double prefix would be caught by the count.
                let home = "/home/CI";
                let joined = join_home(home, &rel);
                prop_assert_eq!(&joined, &format!("{}/{}", home, rel));
                prop_assert!(is_absolute(&joined));
                prop_assert_eq!(joined.matches(home).count(), 1);
            }
        }
    }
}

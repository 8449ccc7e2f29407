//! Container-runtime version probe.
//!
//! Resolves which release tag is currently executing so auxiliary tool
//! images can be pinned to the same version. Resolved exactly once at
//! startup and passed by value to whoever needs it; there is no
//! process-wide cache.

use std::env;
use std::fs;

use tracing::debug;

use crate::docker::DockerCommand;

/// Tag used when the probe cannot determine a version.
pub const DEFAULT_VERSION: &str = "latest";

/// Resolves the release tag of the container this process runs in.
///
/// Order: `CHE_VERSION` env override, then `docker inspect` of the
/// current container's image reference, then [`DEFAULT_VERSION`].
pub fn resolve_container_version() -> String {
    if let Ok(version) = env::var("CHE_VERSION") {
        return version;
    }

    let Some(container_id) = current_container_id() else {
        debug!("No container id available, assuming {}", DEFAULT_VERSION);
        return DEFAULT_VERSION.to_string();
    };

    match DockerCommand::new("inspect")
        .arg("--format")
        .arg("{{.Config.Image}}")
        .arg(&container_id)
        .execute_with_output()
    {
        Ok(image_ref) => image_tag(&image_ref).unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        Err(e) => {
            debug!("Version probe failed ({}), assuming {}", e, DEFAULT_VERSION);
            DEFAULT_VERSION.to_string()
        }
    }
}

fn current_container_id() -> Option<String> {
    if let Ok(hostname) = env::var("HOSTNAME") {
        return Some(hostname);
    }
    fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the tag of an image reference, `None` when untagged.
/// Registry ports (`host:5000/image`) are not mistaken for tags.
pub fn image_tag(image_ref: &str) -> Option<String> {
    let after_slash = image_ref.rsplit('/').next()?;
    let (_, tag) = after_slash.split_once(':')?;
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_tag() {
        assert_eq!(image_tag("eclipse/che-launcher:5.0.0"), Some("5.0.0".to_string()));
    }

    #[test]
    fn untagged_image_has_no_tag() {
        assert_eq!(image_tag("eclipse/che-launcher"), None);
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        assert_eq!(image_tag("registry.local:5000/che-launcher"), None);
        assert_eq!(
            image_tag("registry.local:5000/che-launcher:nightly"),
            Some("nightly".to_string())
        );
    }
}

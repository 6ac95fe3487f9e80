use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    Created,
    Planned,
    AlreadyLinked,
    /// Something other than our link already occupies the slot.
    Occupied(PathBuf),
}

#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub link_path: PathBuf,
    pub state: LinkState,
}

fn platform_plugins_root(data_dir: Option<PathBuf>) -> Option<PathBuf> {
    let data_dir = data_dir?;
    if cfg!(target_os = "macos") {
        Some(data_dir.join("com.elgato.StreamDeck").join("Plugins"))
    } else if cfg!(windows) {
        Some(data_dir.join("Elgato").join("StreamDeck").join("Plugins"))
    } else {
        None
    }
}

/// `SDPACK_STREAMDECK_PLUGINS_DIR`, else where the Stream Deck app looks on
/// macOS and Windows. Other platforms need the override.
pub fn resolve_plugins_root() -> Result<PathBuf> {
    if let Ok(custom) = env::var("SDPACK_STREAMDECK_PLUGINS_DIR") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    platform_plugins_root(dirs::data_dir()).context(
        "Stream Deck plugins directory unknown on this platform; set SDPACK_STREAMDECK_PLUGINS_DIR",
    )
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

pub fn link_plugin(plugin_dir: &Path, plugins_root: &Path, dry_run: bool) -> Result<LinkOutcome> {
    let name = plugin_dir
        .file_name()
        .context("plugin directory has no folder name")?;
    let link_path = plugins_root.join(name);
    let target = fs::canonicalize(plugin_dir)
        .with_context(|| format!("plugin directory not found: {}", plugin_dir.display()))?;

    if let Ok(meta) = fs::symlink_metadata(&link_path) {
        let state = if meta.file_type().is_symlink() {
            match fs::read_link(&link_path) {
                Ok(existing) if existing == target => LinkState::AlreadyLinked,
                Ok(existing) => LinkState::Occupied(existing),
                Err(_) => LinkState::Occupied(link_path.clone()),
            }
        } else {
            LinkState::Occupied(link_path.clone())
        };
        return Ok(LinkOutcome { link_path, state });
    }

    if dry_run {
        return Ok(LinkOutcome {
            link_path,
            state: LinkState::Planned,
        });
    }

    fs::create_dir_all(plugins_root)
        .with_context(|| format!("failed to create {}", plugins_root.display()))?;
    symlink_dir(&target, &link_path).with_context(|| {
        format!(
            "failed to link {} -> {}",
            link_path.display(),
            target.display()
        )
    })?;
    Ok(LinkOutcome {
        link_path,
        state: LinkState::Created,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn link_is_created_then_recognized() {
        let tmp = tempdir().expect("tempdir");
        let plugin = tmp.path().join("demo.sdPlugin");
        fs::create_dir_all(&plugin).expect("mkdir");
        let root = tmp.path().join("StreamDeck").join("Plugins");

        let first = link_plugin(&plugin, &root, false).expect("link");
        assert_eq!(first.state, LinkState::Created);
        assert_eq!(first.link_path, root.join("demo.sdPlugin"));
        assert!(first.link_path.join(".").exists());

        let second = link_plugin(&plugin, &root, false).expect("relink");
        assert_eq!(second.state, LinkState::AlreadyLinked);
    }

    #[test]
    fn dry_run_plans_without_touching_disk() {
        let tmp = tempdir().expect("tempdir");
        let plugin = tmp.path().join("demo.sdPlugin");
        fs::create_dir_all(&plugin).expect("mkdir");
        let root = tmp.path().join("Plugins");

        let outcome = link_plugin(&plugin, &root, true).expect("plan");
        assert_eq!(outcome.state, LinkState::Planned);
        assert!(!root.exists());
    }

    #[test]
    fn foreign_directory_is_reported_not_replaced() {
        let tmp = tempdir().expect("tempdir");
        let plugin = tmp.path().join("demo.sdPlugin");
        fs::create_dir_all(&plugin).expect("mkdir");
        let root = tmp.path().join("Plugins");
        fs::create_dir_all(root.join("demo.sdPlugin")).expect("mkdir foreign");

        let outcome = link_plugin(&plugin, &root, false).expect("inspect");
        assert!(matches!(outcome.state, LinkState::Occupied(_)));
        assert!(!fs::symlink_metadata(root.join("demo.sdPlugin"))
            .expect("meta")
            .file_type()
            .is_symlink());
    }

    #[test]
    fn missing_plugin_dir_is_an_error() {
        let tmp = tempdir().expect("tempdir");
        let err = link_plugin(&tmp.path().join("nope.sdPlugin"), tmp.path(), false)
            .expect_err("should fail");
        assert!(err.to_string().contains("plugin directory not found"));
    }
}

use crate::plugin::config::SdPackConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub project_root: PathBuf,
    pub plugin_id: String,
    pub plugin_dir: PathBuf,
    pub images_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub archive_path: PathBuf,
}

fn project_root_from_inputs(
    flag: Option<&Path>,
    env_value: Option<&str>,
    cwd: PathBuf,
) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    match env_value {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => cwd,
    }
}

/// `--project-dir`, then `SDPACK_PROJECT_DIR`, then the working directory.
pub fn resolve_project_root(flag: Option<&Path>) -> Result<PathBuf> {
    let cwd = env::current_dir().context("failed to resolve current working directory")?;
    let env_value = env::var("SDPACK_PROJECT_DIR").ok();
    Ok(project_root_from_inputs(flag, env_value.as_deref(), cwd))
}

pub fn resolve_paths(project_root: &Path, cfg: &SdPackConfig) -> ProjectPaths {
    let plugin_dir = project_root.join(cfg.plugin_dir_name());
    ProjectPaths {
        project_root: project_root.to_path_buf(),
        plugin_id: cfg.plugin.id.clone(),
        images_dir: plugin_dir.join("images"),
        manifest_path: plugin_dir.join("manifest.json"),
        archive_path: project_root.join(cfg.archive_name()),
        plugin_dir,
    }
}

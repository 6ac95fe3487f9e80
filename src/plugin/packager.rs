use crate::error::SdPackError;
use crate::util::{failure_summary, file_sha256, run_command_with_timeout};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub trait Archiver {
    /// Zip `entry` (relative to `working_dir`) into `output`, skipping `exclude` globs.
    fn archive(&self, working_dir: &Path, entry: &str, output: &Path, exclude: &[String])
    -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ZipCommandArchiver {
    pub bin: PathBuf,
    pub timeout_secs: u64,
}

impl ZipCommandArchiver {
    pub fn resolve(bin: &str, timeout_secs: u64) -> Result<Self> {
        let bin = which::which(bin)
            .with_context(|| format!("archiver `{bin}` not found (set SDPACK_ZIP_BIN)"))?;
        Ok(Self { bin, timeout_secs })
    }
}

impl Archiver for ZipCommandArchiver {
    fn archive(
        &self,
        working_dir: &Path,
        entry: &str,
        output: &Path,
        exclude: &[String],
    ) -> Result<()> {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(working_dir)
            .arg("-r")
            .arg("-q")
            .arg(output)
            .arg(entry);
        for pattern in exclude {
            cmd.arg("-x").arg(pattern);
        }
        let out = run_command_with_timeout(&mut cmd, self.timeout_secs)
            .with_context(|| format!("failed to run `{}`", self.bin.display()))?;
        if !out.status.success() {
            anyhow::bail!("{}", failure_summary(&out));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PackRequest<'a> {
    pub plugin_dir: &'a Path,
    pub archive_path: &'a Path,
    pub exclude: &'a [String],
}

#[derive(Debug, Clone)]
pub struct PackOutcome {
    pub archive_path: PathBuf,
    pub replaced_previous: bool,
    pub bytes: u64,
    pub sha256: String,
}

impl PackOutcome {
    pub fn size_kb(&self) -> String {
        format!("{:.2}", self.bytes as f64 / 1024.0)
    }
}

fn packaging_failed(reason: impl Into<String>) -> anyhow::Error {
    SdPackError::PackagingFailed(reason.into()).into()
}

/// Build the distributable archive. The plugin folder itself is the archive's
/// top-level entry, which is what the host runtime expects to unpack.
pub fn pack(request: &PackRequest<'_>, archiver: &dyn Archiver) -> Result<PackOutcome> {
    if !request.plugin_dir.is_dir() {
        return Err(packaging_failed(format!(
            "plugin directory not found: {}",
            request.plugin_dir.display()
        )));
    }
    let working_dir = request
        .plugin_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let entry = request
        .plugin_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| packaging_failed("plugin directory has no folder name"))?;
    let output_dir = request
        .archive_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let replaced_previous = request.archive_path.exists();
    if replaced_previous {
        fs::remove_file(request.archive_path).with_context(|| {
            format!("failed to remove old package {}", request.archive_path.display())
        })?;
    }

    // Zip into a staging dir so a failed run never leaves a partial archive behind.
    let staging = tempfile::Builder::new()
        .prefix(".sdpack-")
        .tempdir_in(output_dir)
        .with_context(|| format!("failed to create staging dir in {}", output_dir.display()))?;
    let staged = staging.path().join("package.zip");
    let staged_abs = fs::canonicalize(staging.path())
        .map(|dir| dir.join("package.zip"))
        .unwrap_or_else(|_| staged.clone());

    archiver
        .archive(working_dir, &entry, &staged_abs, request.exclude)
        .map_err(|err| packaging_failed(format!("{err:#}")))?;
    if !staged_abs.is_file() {
        return Err(packaging_failed("archiver reported success but wrote no archive"));
    }

    fs::rename(&staged_abs, request.archive_path).with_context(|| {
        format!("failed to move package into {}", request.archive_path.display())
    })?;

    let bytes = fs::metadata(request.archive_path)?.len();
    let sha256 = file_sha256(request.archive_path)?;
    Ok(PackOutcome {
        archive_path: request.archive_path.to_path_buf(),
        replaced_previous,
        bytes,
        sha256,
    })
}

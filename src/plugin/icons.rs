use crate::error::SdPackError;
use crate::plugin::assets::IconSpec;
use crate::util::{failure_summary, run_command_with_timeout};
use crate::warn::{self, WarnEvent};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Base size used for every icon by the uniform preset (key-sized 144, 288 @2x).
pub const UNIFORM_BASE_SIZE: u32 = 144;

pub trait IconConverter {
    /// Render `svg` as a `size`×`size` PNG at `output`.
    fn convert(&self, svg: &Path, size: u32, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct CommandConverter {
    pub bin: PathBuf,
    pub timeout_secs: u64,
}

impl CommandConverter {
    pub fn resolve(bin: &str, timeout_secs: u64) -> Result<Self> {
        let bin = which::which(bin)
            .with_context(|| format!("image converter `{bin}` not found (set SDPACK_CONVERTER_BIN)"))?;
        Ok(Self { bin, timeout_secs })
    }
}

impl IconConverter for CommandConverter {
    fn convert(&self, svg: &Path, size: u32, output: &Path) -> Result<()> {
        let size_arg = size.to_string();
        let mut cmd = Command::new(&self.bin);
        cmd.args(["-w", &size_arg, "-h", &size_arg, "-f", "png", "-o"])
            .arg(output)
            .arg(svg);
        let out = run_command_with_timeout(&mut cmd, self.timeout_secs)
            .with_context(|| format!("failed to run `{}`", self.bin.display()))?;
        if !out.status.success() {
            anyhow::bail!("{}", failure_summary(&out));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePreset {
    /// Each icon's own base size and its double.
    Catalog,
    /// 144 and 288 for every icon.
    Uniform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTarget {
    pub size: u32,
    pub file_name: String,
    pub high_density: bool,
}

pub fn raster_targets(spec: &IconSpec, preset: SizePreset) -> [RasterTarget; 2] {
    let base = match preset {
        SizePreset::Catalog => spec.base_size,
        SizePreset::Uniform => UNIFORM_BASE_SIZE,
    };
    [
        raster_target(spec.name, base, base),
        raster_target(spec.name, base, base * 2),
    ]
}

pub fn raster_target(name: &str, base_size: u32, size: u32) -> RasterTarget {
    let high_density = size >= base_size.saturating_mul(2);
    let file_name = if high_density {
        format!("{name}@2x.png")
    } else {
        format!("{name}.png")
    };
    RasterTarget {
        size,
        file_name,
        high_density,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Created {
        file_name: String,
        size: u32,
        high_density: bool,
    },
    Failed { file_name: String, reason: String },
    Skipped { icon: String },
}

#[derive(Debug, Clone, Default)]
pub struct RasterSummary {
    pub outcomes: Vec<ConversionOutcome>,
}

impl RasterSummary {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, ConversionOutcome::Created { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ConversionOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ConversionOutcome::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&ConversionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Convert each catalog icon sequentially. A missing source or a failed
/// conversion is recorded and the loop moves on.
pub fn rasterize_icons(
    images_dir: &Path,
    catalog: &[IconSpec],
    preset: SizePreset,
    converter: &dyn IconConverter,
) -> RasterSummary {
    let mut summary = RasterSummary::default();
    for spec in catalog {
        let svg = images_dir.join(spec.svg_file_name());
        if !svg.is_file() {
            warn::emit(WarnEvent {
                code: "W001_ICON_SOURCE_MISSING",
                stage: "icons",
                target: &spec.svg_file_name(),
                reason: "vector source not found, skipping",
            });
            summary.outcomes.push(ConversionOutcome::Skipped {
                icon: spec.name.to_string(),
            });
            continue;
        }

        for target in raster_targets(spec, preset) {
            let output = images_dir.join(&target.file_name);
            match converter.convert(&svg, target.size, &output) {
                Ok(()) => summary.outcomes.push(ConversionOutcome::Created {
                    file_name: target.file_name,
                    size: target.size,
                    high_density: target.high_density,
                }),
                Err(err) => {
                    let failure = SdPackError::ConversionFailed(format!("{err:#}"));
                    warn::emit(WarnEvent {
                        code: failure.code().as_str(),
                        stage: "icons",
                        target: &target.file_name,
                        reason: &format!("{err:#}"),
                    });
                    summary.outcomes.push(ConversionOutcome::Failed {
                        file_name: target.file_name,
                        reason: failure.to_string(),
                    });
                }
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::assets::{ICON_CATALOG, materialize_placeholders};
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingConverter {
        calls: RefCell<Vec<(String, u32)>>,
        fail_on: Option<&'static str>,
    }

    impl IconConverter for RecordingConverter {
        fn convert(&self, _svg: &Path, size: u32, output: &Path) -> Result<()> {
            let name = output
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.calls.borrow_mut().push((name.clone(), size));
            if self.fail_on == Some(name.as_str()) {
                anyhow::bail!("renderer crashed");
            }
            fs::write(output, format!("png {size}"))?;
            Ok(())
        }
    }

    #[test]
    fn standard_and_high_density_names_do_not_collide() {
        for spec in &ICON_CATALOG {
            let [standard, dense] = raster_targets(spec, SizePreset::Catalog);
            assert_eq!(standard.file_name, format!("{}.png", spec.name));
            assert!(!standard.high_density);
            assert_eq!(dense.file_name, format!("{}@2x.png", spec.name));
            assert!(dense.high_density);
            assert_eq!(dense.size, standard.size * 2);
        }
    }

    #[test]
    fn plugin_icon_sizes_match_store_listing() {
        let [standard, dense] = raster_targets(&ICON_CATALOG[0], SizePreset::Catalog);
        assert_eq!((standard.size, dense.size), (256, 512));
        let [standard, dense] = raster_targets(&ICON_CATALOG[1], SizePreset::Catalog);
        assert_eq!((standard.size, dense.size), (28, 56));
    }

    #[test]
    fn uniform_preset_uses_144_and_288() {
        let [standard, dense] = raster_targets(&ICON_CATALOG[1], SizePreset::Uniform);
        assert_eq!(standard.size, 144);
        assert_eq!(standard.file_name, "categoryIcon.png");
        assert_eq!(dense.size, 288);
        assert_eq!(dense.file_name, "categoryIcon@2x.png");
    }

    #[test]
    fn missing_source_is_skipped_and_others_converted() {
        let tmp = tempdir().expect("tempdir");
        let images = tmp.path().join("images");
        materialize_placeholders(&images, &ICON_CATALOG[..2]).expect("placeholders");

        let converter = RecordingConverter::default();
        let summary = rasterize_icons(&images, &ICON_CATALOG[..3], SizePreset::Catalog, &converter);

        assert_eq!(summary.created(), 4);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 0);
        assert!(images.join("pluginIcon.png").exists());
        assert!(images.join("pluginIcon@2x.png").exists());
        assert_eq!(
            fs::read_to_string(images.join("categoryIcon@2x.png")).expect("read"),
            "png 56"
        );
    }

    #[test]
    fn one_failure_does_not_abort_the_batch() {
        let tmp = tempdir().expect("tempdir");
        let images = tmp.path().join("images");
        materialize_placeholders(&images, &ICON_CATALOG).expect("placeholders");

        let converter = RecordingConverter {
            fail_on: Some("clockout.png"),
            ..Default::default()
        };
        let summary = rasterize_icons(&images, &ICON_CATALOG, SizePreset::Catalog, &converter);

        assert_eq!(converter.calls.borrow().len(), ICON_CATALOG.len() * 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.created(), ICON_CATALOG.len() * 2 - 1);
        let failed = summary
            .outcomes
            .iter()
            .find_map(|o| match o {
                ConversionOutcome::Failed { file_name, reason } => Some((file_name, reason)),
                _ => None,
            })
            .expect("failed outcome");
        assert_eq!(failed.0, "clockout.png");
        assert!(failed.1.contains("E004_CONVERSION_FAILED"));
        assert!(failed.1.contains("renderer crashed"));
    }

    #[test]
    fn conversions_run_in_catalog_order() {
        let tmp = tempdir().expect("tempdir");
        let images = tmp.path().join("images");
        materialize_placeholders(&images, &ICON_CATALOG[2..4]).expect("placeholders");

        let converter = RecordingConverter::default();
        rasterize_icons(&images, &ICON_CATALOG[2..4], SizePreset::Catalog, &converter);
        let calls = converter.calls.borrow();
        let names: Vec<&str> = calls.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["clockin.png", "clockin@2x.png", "clockout.png", "clockout@2x.png"]
        );
    }
}

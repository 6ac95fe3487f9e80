use anyhow::Result;

use crate::commands::{CommandReport, ProjectContext};
use crate::plugin::assets::{ICON_CATALOG, materialize_placeholders};
use crate::plugin::icons::{CommandConverter, ConversionOutcome, SizePreset, rasterize_icons};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub preset: SizePreset,
    pub strict: bool,
}

pub fn generate(ctx: &ProjectContext) -> Result<CommandReport> {
    let mut report = CommandReport::new("icons-generate");
    let outcome = materialize_placeholders(&ctx.paths.images_dir, &ICON_CATALOG)?;
    report.detail(format!("images_dir={}", ctx.paths.images_dir.display()));
    for name in &outcome.created {
        report.detail(format!("icon created: {name}"));
    }
    for name in &outcome.existing {
        report.detail(format!("icon exists: {name}"));
    }
    report.detail(format!("placeholders_created={}", outcome.created.len()));
    Ok(report)
}

pub fn convert(ctx: &ProjectContext, opts: &ConvertOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("icons-convert");
    let converter = CommandConverter::resolve(
        &ctx.config.icons.converter_bin,
        ctx.config.command_timeout_secs,
    )?;
    report.detail(format!("converter={}", converter.bin.display()));
    report.detail(format!("preset={:?}", opts.preset));

    let summary = rasterize_icons(&ctx.paths.images_dir, &ICON_CATALOG, opts.preset, &converter);
    for outcome in &summary.outcomes {
        match outcome {
            ConversionOutcome::Created {
                file_name,
                size,
                high_density,
            } => {
                let density = if *high_density { ", high-density" } else { "" };
                report.detail(format!("created {file_name} ({size}x{size}px{density})"));
            }
            ConversionOutcome::Skipped { icon } => {
                report.detail(format!("skipped {icon}: {icon}.svg not found"));
            }
            ConversionOutcome::Failed { file_name, reason } => {
                let line = format!("{file_name}: {reason}");
                if opts.strict {
                    report.issue(line);
                } else {
                    report.detail(format!("failed {line}"));
                }
            }
        }
    }
    report.detail(format!(
        "summary created={} failed={} skipped={}",
        summary.created(),
        summary.failed(),
        summary.skipped()
    ));
    Ok(report)
}

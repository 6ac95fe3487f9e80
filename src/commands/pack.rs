use anyhow::Result;

use crate::commands::{CommandReport, ProjectContext};
use crate::error::SdPackError;
use crate::plugin::packager::{PackRequest, ZipCommandArchiver, pack};

pub fn run(ctx: &ProjectContext) -> Result<CommandReport> {
    let paths = &ctx.paths;
    let mut report = CommandReport::new("pack");
    report.detail(format!("plugin_id={}", paths.plugin_id));
    report.detail(format!("plugin_dir={}", paths.plugin_dir.display()));

    if !paths.plugin_dir.is_dir() {
        report.issue(
            SdPackError::PackagingFailed(format!(
                "plugin directory not found: {}",
                paths.plugin_dir.display()
            ))
            .to_string(),
        );
        return Ok(report);
    }

    let archiver = match ZipCommandArchiver::resolve(
        &ctx.config.pack.zip_bin,
        ctx.config.command_timeout_secs,
    ) {
        Ok(archiver) => archiver,
        Err(err) => {
            report.issue(SdPackError::PackagingFailed(format!("{err:#}")).to_string());
            return Ok(report);
        }
    };

    let request = PackRequest {
        plugin_dir: &paths.plugin_dir,
        archive_path: &paths.archive_path,
        exclude: &ctx.config.pack.exclude,
    };
    match pack(&request, &archiver) {
        Ok(outcome) => {
            if outcome.replaced_previous {
                report.detail("removed previous package".to_string());
            }
            report.detail(format!("output={}", outcome.archive_path.display()));
            report.detail(format!("size_kb={}", outcome.size_kb()));
            report.detail(format!("bytes={}", outcome.bytes));
            report.detail(format!("sha256={}", outcome.sha256));
            report.detail("install: double-click the .streamDeckPlugin file".to_string());
        }
        Err(err) => report.issue(format!("{err:#}")),
    }
    Ok(report)
}

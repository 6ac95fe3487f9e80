use anyhow::Result;

use crate::commands::{CommandReport, ProjectContext};
use crate::error::SdPackError;
use crate::plugin::assets::{
    ICON_CATALOG, check_required_files, ensure_gitignore, ensure_images_dir,
    materialize_placeholders,
};
use crate::plugin::manifest::validate_manifest;

pub fn run(ctx: &ProjectContext) -> Result<CommandReport> {
    let paths = &ctx.paths;
    let mut report = CommandReport::new("build");
    report.detail(format!("plugin_dir={}", paths.plugin_dir.display()));

    if ensure_images_dir(&paths.images_dir)? {
        report.detail(format!("created {}", paths.images_dir.display()));
    }

    let files = check_required_files(&paths.plugin_dir, &ctx.config.plugin.required_files);
    for name in &files.present {
        report.detail(format!("required_file ok: {name}"));
    }
    for name in files.missing {
        report.issue(SdPackError::MissingAsset(name).to_string());
    }

    let icons = materialize_placeholders(&paths.images_dir, &ICON_CATALOG)?;
    for name in &icons.created {
        report.detail(format!("icon created: {name}"));
    }
    for name in &icons.existing {
        report.detail(format!("icon exists: {name}"));
    }
    report.detail(format!("placeholders_created={}", icons.created.len()));

    let manifest = validate_manifest(&paths.plugin_dir, &paths.manifest_path);
    if let Some(record) = &manifest.record {
        let fields = ["name", "version", "uuid", "code_path"];
        for (label, (_, value)) in fields.iter().zip(record.required_fields()) {
            if let Some(value) = value {
                report.detail(format!("manifest.{label}={value}"));
            }
        }
        report.detail(format!("manifest.actions={}", record.actions.len()));
    }
    if manifest.ok()
        && let Some(code_path) = &manifest.code_path
    {
        report.detail(format!("code_path_exists={}", code_path.display()));
    }
    for failure in manifest.failures {
        report.issue(failure.to_string());
    }

    if ensure_gitignore(&paths.project_root)? {
        report.detail("created .gitignore".to_string());
    }

    if report.ok {
        report.detail("next: run `sdpack link` and restart the Stream Deck app".to_string());
    }
    Ok(report)
}

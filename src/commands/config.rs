use anyhow::Result;

use crate::commands::{CommandReport, ProjectContext};

pub fn run(ctx: &ProjectContext) -> Result<CommandReport> {
    let mut report = CommandReport::new("config");
    let cfg = &ctx.config;

    report.detail(
        "resolution.order=defaults -> sdpack.toml overrides -> environment overrides".to_string(),
    );
    if ctx.config_path.exists() {
        report.detail(format!("resolution.sdpack_toml={}", ctx.config_path.display()));
    } else {
        report.detail(format!(
            "resolution.sdpack_toml=missing ({})",
            ctx.config_path.display()
        ));
    }

    report.detail(format!("project_root={}", ctx.paths.project_root.display()));
    report.detail(format!("plugin.id={}", cfg.plugin.id));
    report.detail(format!("plugin.dir={}", cfg.plugin_dir_name()));
    report.detail(format!(
        "plugin.required_files={:?}",
        cfg.plugin.required_files
    ));
    report.detail(format!("pack.zip_bin={}", cfg.pack.zip_bin));
    report.detail(format!("pack.exclude={:?}", cfg.pack.exclude));
    report.detail(format!("pack.archive={}", ctx.paths.archive_path.display()));
    report.detail(format!("icons.converter_bin={}", cfg.icons.converter_bin));
    report.detail(format!(
        "i18n.fallback_language={}",
        cfg.i18n.fallback_language
    ));
    report.detail(format!("i18n.languages={:?}", cfg.i18n.languages));
    report.detail(format!(
        "command_timeout_secs={}",
        cfg.command_timeout_secs
    ));
    Ok(report)
}

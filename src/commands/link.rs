use anyhow::Result;

use crate::commands::{CommandReport, ProjectContext};
use crate::plugin::install::{LinkState, link_plugin, resolve_plugins_root};

#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    pub dry_run: bool,
}

pub fn run(ctx: &ProjectContext, opts: &LinkOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("link");
    let plugins_root = resolve_plugins_root()?;
    report.detail(format!("plugins_root={}", plugins_root.display()));

    let outcome = link_plugin(&ctx.paths.plugin_dir, &plugins_root, opts.dry_run)?;
    report.detail(format!("link={}", outcome.link_path.display()));
    match outcome.state {
        LinkState::Created => report.detail("link created; restart the Stream Deck app".to_string()),
        LinkState::Planned => report.detail("dry-run: link planned but not created".to_string()),
        LinkState::AlreadyLinked => report.detail("link already in place".to_string()),
        LinkState::Occupied(existing) => report.issue(format!(
            "{} is occupied by {}; remove it first",
            outcome.link_path.display(),
            existing.display()
        )),
    }
    Ok(report)
}

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use serde_json::Value;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::{CommandReport, ProjectContext};
use crate::error::ErrorCode;
use crate::i18n::loader::{LanguageSource, LanguageTag, LocalFileSource, RemoteSource};
use crate::i18n::page::{apply, referenced_keys, scan_elements};
use crate::i18n::store::{InitOutcome, TranslationStore};

#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub lang: Option<LanguageTag>,
    pub base_url: Option<String>,
    pub unwrap_localization: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct LookupOptions {
    pub key: String,
    pub default: Option<String>,
    pub source: SourceOptions,
}

fn fallback_tag(ctx: &ProjectContext) -> Result<LanguageTag> {
    Ok(LanguageTag::parse(&ctx.config.i18n.fallback_language)?)
}

fn build_source(ctx: &ProjectContext, opts: &SourceOptions) -> Result<Box<dyn LanguageSource>> {
    if let Some(base_url) = &opts.base_url {
        let mut source = RemoteSource::new(base_url.clone())?;
        if let Some(unwrap) = opts.unwrap_localization {
            source.unwrap_localization = unwrap;
        }
        return Ok(Box::new(source));
    }
    let mut source = LocalFileSource::new(&ctx.paths.plugin_dir);
    if let Some(unwrap) = opts.unwrap_localization {
        source.unwrap_localization = unwrap;
    }
    Ok(Box::new(source))
}

fn init_store(
    ctx: &ProjectContext,
    opts: &SourceOptions,
    report: &mut CommandReport,
) -> Result<TranslationStore> {
    let fallback = fallback_tag(ctx)?;
    let requested = opts.lang.clone().unwrap_or_else(|| fallback.clone());
    let source = build_source(ctx, opts)?;
    let mut store = TranslationStore::new(fallback);
    let outcome = store.init(source.as_ref(), &requested);

    report.detail(format!("language.requested={requested}"));
    report.detail(format!("language.fallback={}", store.fallback_language()));
    report.detail(format!("language.current={}", store.current_language()));
    report.detail(format!(
        "language.loaded={}",
        match outcome {
            InitOutcome::Requested => "requested",
            InitOutcome::Fallback => "fallback",
            InitOutcome::Empty => "none (empty dictionary)",
        }
    ));
    Ok(store)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn lookup(ctx: &ProjectContext, opts: &LookupOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("i18n-lookup");
    let store = init_store(ctx, &opts.source, &mut report)?;
    let value = store.lookup(&opts.key, opts.default.as_deref());
    report.detail(format!("key={}", opts.key));
    report.detail(format!("resolved={}", store.contains(&opts.key)));
    report.detail(format!("value={}", render(&value)));
    Ok(report)
}

pub fn message(ctx: &ProjectContext, key: &str, source: &SourceOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("i18n-message");
    let store = init_store(ctx, source, &mut report)?;
    report.detail(format!("key=Messages.{key}"));
    report.detail(format!("value={}", store.message(key)));
    Ok(report)
}

fn resolve_page(ctx: &ProjectContext, page: &Path) -> PathBuf {
    if page.is_absolute() || page.exists() {
        page.to_path_buf()
    } else {
        ctx.paths.plugin_dir.join(page)
    }
}

pub fn preview(ctx: &ProjectContext, page: &Path, source: &SourceOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("i18n-preview");
    let path = resolve_page(ctx, page);
    let html =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    report.detail(format!("page={}", path.display()));

    let store = init_store(ctx, source, &mut report)?;
    let elements = scan_elements(&html);
    let applied = apply(&store, &elements);
    for item in &applied {
        let marker = if item.resolved { "" } else { " (missing)" };
        report.detail(format!(
            "<{}> {} {} => {}{marker}",
            item.tag,
            item.target.as_str(),
            item.key,
            item.value
        ));
    }
    report.detail(format!(
        "bindings={} missing={}",
        applied.len(),
        applied.iter().filter(|a| !a.resolved).count()
    ));
    Ok(report)
}

/// HTML pages anywhere under the plugin folder, `node_modules` excluded.
fn html_pages(plugin_dir: &Path) -> Result<Vec<PathBuf>> {
    if !plugin_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut pages = Vec::new();
    let walker = WalkBuilder::new(plugin_dir)
        .hidden(false)
        .follow_links(false)
        .filter_entry(|entry| entry.file_name() != OsStr::new("node_modules"))
        .build();
    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", plugin_dir.display()))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        {
            pages.push(path.to_path_buf());
        }
    }
    pages.sort();
    Ok(pages)
}

/// Every configured language decodes, carries the fallback language's keys,
/// and resolves every key the plugin's HTML pages bind.
pub fn check(ctx: &ProjectContext) -> Result<CommandReport> {
    let mut report = CommandReport::new("i18n-check");
    let fallback = fallback_tag(ctx)?;

    // Pages resolve keys the way the property inspector does, unwrapping `Localization`.
    let source = LocalFileSource {
        dir: ctx.paths.plugin_dir.clone(),
        unwrap_localization: true,
    };

    let mut page_keys = BTreeSet::new();
    for page in html_pages(&ctx.paths.plugin_dir)? {
        let html = fs::read_to_string(&page)
            .with_context(|| format!("failed to read {}", page.display()))?;
        let keys = referenced_keys(&scan_elements(&html));
        report.detail(format!("page {} binds {} key(s)", page.display(), keys.len()));
        page_keys.extend(keys);
    }

    let mut languages: Vec<LanguageTag> = Vec::new();
    let configured = std::iter::once(&ctx.config.i18n.fallback_language)
        .chain(&ctx.config.i18n.languages);
    for raw in configured {
        let tag = LanguageTag::parse(raw)?;
        if !languages.contains(&tag) {
            languages.push(tag);
        }
    }

    let mut reference = TranslationStore::new(fallback.clone());
    let reference_keys = match reference.init(&source, &fallback) {
        InitOutcome::Requested => reference.leaf_keys(),
        _ => Vec::new(),
    };

    for tag in &languages {
        let mut store = TranslationStore::new(fallback.clone());
        if store.init(&source, tag) != InitOutcome::Requested {
            report.issue(format!(
                "code={} {} could not be loaded from {}",
                ErrorCode::E003TranslationLoadFailed.as_str(),
                tag.file_name(),
                ctx.paths.plugin_dir.display()
            ));
            continue;
        }
        report.detail(format!("{} keys={}", tag.file_name(), store.leaf_keys().len()));

        for key in &reference_keys {
            if !store.contains(key) {
                report.issue(format!("{tag}.json lacks `{key}` present in {fallback}.json"));
            }
        }
        for key in &page_keys {
            if !store.contains(key) {
                report.issue(format!("{tag}.json cannot resolve page key `{key}`"));
            }
        }
    }
    Ok(report)
}


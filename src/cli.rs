use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::i18n::loader::LanguageTag;
use crate::plugin::icons::SizePreset;

#[derive(Debug, Parser)]
#[command(name = "sdpack")]
#[command(about = "Build, check, and package a Stream Deck plugin project")]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,

    /// Project root holding the `.sdPlugin` folder (defaults to SDPACK_PROJECT_DIR or cwd).
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check required files and the manifest, creating missing placeholder icons.
    Build,
    /// Zip the plugin folder into `<plugin-id>.streamDeckPlugin`.
    Pack,
    #[command(subcommand)]
    Icons(IconsCommand),
    /// Symlink the plugin folder into the Stream Deck plugins directory.
    Link(LinkArgs),
    #[command(subcommand)]
    I18n(I18nCommand),
    /// Show the resolved configuration.
    Config,
}

#[derive(Debug, Subcommand)]
pub enum IconsCommand {
    /// Write placeholder SVGs for catalog icons that have none.
    Generate,
    /// Rasterize every catalog SVG to its standard and @2x PNG.
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Render every icon at 144px and 288px instead of its own sizes.
    #[arg(long)]
    pub uniform: bool,
    /// Fail the command when any conversion fails.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    #[arg(long, value_parser = parse_language_tag)]
    pub lang: Option<LanguageTag>,
    /// Fetch `<base-url>/<lang>.json` over HTTP instead of reading the plugin folder.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Use the document's `Localization` member as the dictionary.
    #[arg(long, action = clap::ArgAction::Set)]
    pub unwrap_localization: Option<bool>,
}

#[derive(Debug, Subcommand)]
pub enum I18nCommand {
    Lookup {
        key: String,
        #[arg(long)]
        default: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Look up `Messages.<key>`.
    Message {
        key: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show what each `data-i18n*` element of an HTML page receives.
    Preview {
        page: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Cross-check language files against each other and against the HTML pages.
    Check,
}

fn parse_language_tag(raw: &str) -> Result<LanguageTag, String> {
    LanguageTag::parse(raw).map_err(|err| err.to_string())
}

impl SourceArgs {
    fn options(&self) -> commands::i18n::SourceOptions {
        commands::i18n::SourceOptions {
            lang: self.lang.clone(),
            base_url: self.base_url.clone(),
            unwrap_localization: self.unwrap_localization,
        }
    }
}

fn print_report(report: &commands::CommandReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("command: {}", report.command);
    println!("ok: {}", report.ok);
    if !report.details.is_empty() {
        println!("details:");
        for detail in &report.details {
            println!("- {detail}");
        }
    }
    if !report.issues.is_empty() {
        println!("issues:");
        for issue in &report.issues {
            println!("- {issue}");
        }
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = commands::load_project(cli.project_dir.as_deref())?;

    let report = match &cli.command {
        Command::Build => commands::build::run(&ctx)?,
        Command::Pack => commands::pack::run(&ctx)?,
        Command::Icons(IconsCommand::Generate) => commands::icons::generate(&ctx)?,
        Command::Icons(IconsCommand::Convert(args)) => commands::icons::convert(
            &ctx,
            &commands::icons::ConvertOptions {
                preset: if args.uniform {
                    SizePreset::Uniform
                } else {
                    SizePreset::Catalog
                },
                strict: args.strict,
            },
        )?,
        Command::Link(args) => commands::link::run(
            &ctx,
            &commands::link::LinkOptions {
                dry_run: args.dry_run,
            },
        )?,
        Command::I18n(I18nCommand::Lookup {
            key,
            default,
            source,
        }) => commands::i18n::lookup(
            &ctx,
            &commands::i18n::LookupOptions {
                key: key.clone(),
                default: default.clone(),
                source: source.options(),
            },
        )?,
        Command::I18n(I18nCommand::Message { key, source }) => {
            commands::i18n::message(&ctx, key, &source.options())?
        }
        Command::I18n(I18nCommand::Preview { page, source }) => {
            commands::i18n::preview(&ctx, page, &source.options())?
        }
        Command::I18n(I18nCommand::Check) => commands::i18n::check(&ctx)?,
        Command::Config => commands::config::run(&ctx)?,
    };

    print_report(&report, cli.json)?;

    if report.ok {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

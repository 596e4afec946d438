//! patoc - Entry Point

use clap::{Parser, Subcommand, ValueEnum};
use patoc::config::{self, CliOverrides, ResolvedConfig};
use patoc::document::{self, HideReason, Initialization, MissingElement, PageDocument};
use patoc::integration::{self, Scenario};
use patoc::model::error::{read_input, AppError};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Progress-aware table of contents for rendered HTML pages
#[derive(Parser, Debug)]
#[command(name = "patoc")]
#[command(version)]
#[command(about = "Build tables of contents and replay scroll tracking for HTML pages")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Selector of the element holding the headings
    #[arg(long, global = true)]
    pub content_selector: Option<String>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Populate every table of contents container in a page
    Render {
        /// HTML page
        file: PathBuf,
        /// Write the page here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the headings that would be listed
    Outline {
        /// HTML page
        file: PathBuf,
        /// Comma-separated heading tags, e.g. "h2,h3"
        #[arg(long)]
        levels: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutlineFormat::Text)]
        format: OutlineFormat,
    },
    /// Print empty container markup for embedding in a page
    Container {
        /// Comma-separated heading tags, e.g. "h2,h3"
        #[arg(long)]
        levels: Option<String>,
        /// Do not indent nested entries
        #[arg(long)]
        no_indent: bool,
    },
    /// Replay a scroll scenario and print the active section after each step
    Simulate {
        /// Scenario JSON file
        scenario: PathBuf,
    },
}

/// Rendering of the `outline` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutlineFormat {
    /// Indented `- Text (#id)` lines
    Text,
    /// JSON array of entries
    Json,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        let (levels, indentation) = match &self.command {
            Command::Outline { levels, .. } => (levels.clone(), None),
            Command::Container { levels, no_indent } => (levels.clone(), no_indent.then_some(false)),
            _ => (None, None),
        };
        CliOverrides {
            content_selector: self.content_selector.clone(),
            levels,
            indentation,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = config::load_config_with_precedence(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(with_env, args.overrides())
    };

    let directive = if args.verbose { "debug" } else { "info" };
    patoc::logging::init(&config.log_file_path, directive)?;

    info!(config = ?config, "Configuration loaded and resolved");

    run(args.command, &config)?;
    Ok(())
}

fn run(command: Command, config: &ResolvedConfig) -> Result<(), AppError> {
    match command {
        Command::Render { file, out } => render(&file, out, config),
        Command::Outline { file, levels, format } => outline(&file, levels.is_some(), format, config),
        Command::Container { .. } => {
            let markup = document::render_container(&config.widget_settings()?);
            writeln!(std::io::stdout().lock(), "{markup}")?;
            Ok(())
        }
        Command::Simulate { scenario } => simulate(&scenario, config),
    }
}

fn render(file: &std::path::Path, out: Option<PathBuf>, config: &ResolvedConfig) -> Result<(), AppError> {
    let source = read_input(file)?;
    let mut page = PageDocument::parse(&source, config.selectors()?);

    let results = page.initialize();
    if results.is_empty() {
        report_skip(file, "no table of contents container found");
    }
    for result in &results {
        match result {
            Initialization::Absent(MissingElement::List) => report_skip(file, "container has no list element"),
            Initialization::Absent(MissingElement::Content) => report_skip(file, "page has no content root"),
            Initialization::Hidden(HideReason::NoLevels) => report_skip(file, "no heading levels enabled; hidden"),
            Initialization::Hidden(HideReason::NoHeadings) => report_skip(file, "no matching headings; hidden"),
            Initialization::Ready { entries, .. } => info!(count = entries.len(), "Rendered entries"),
        }
    }

    let html = page.to_html();
    match out {
        Some(path) => std::fs::write(path, html)?,
        None => writeln!(std::io::stdout().lock(), "{html}")?,
    }
    Ok(())
}

fn report_skip(file: &std::path::Path, reason: &str) {
    warn!(file = %file.display(), reason, "Table of contents not rendered");
    eprintln!("warning: {}: {reason}", file.display());
}

fn outline(
    file: &std::path::Path,
    explicit_levels: bool,
    format: OutlineFormat,
    config: &ResolvedConfig,
) -> Result<(), AppError> {
    let source = read_input(file)?;
    let mut page = PageDocument::parse(&source, config.selectors()?);

    // Explicit --levels, then the page's own widget settings, then config.
    let levels = match page.widget_settings() {
        Some(settings) if !explicit_levels => settings.levels,
        _ => config.levels()?,
    };

    let Some(extraction) = page.extract(&levels) else {
        report_skip(file, "page has no content root");
        return Ok(());
    };

    let rendered = match format {
        OutlineFormat::Text => integration::format_outline_text(extraction.entries()),
        OutlineFormat::Json => integration::format_outline_json(extraction.entries()).map_err(std::io::Error::other)?,
    };
    writeln!(std::io::stdout().lock(), "{rendered}")?;
    Ok(())
}

fn simulate(path: &std::path::Path, config: &ResolvedConfig) -> Result<(), AppError> {
    let scenario = Scenario::parse(&read_input(path)?)?;
    let reports = integration::run_scenario(&scenario, config.widget_options()?)?;

    let mut stdout = std::io::stdout().lock();
    for report in &reports {
        let line = serde_json::to_string(report).map_err(std::io::Error::other)?;
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        // Help returns Err with DisplayHelp, which is success
        let err = Args::try_parse_from(["patoc", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let err = Args::try_parse_from(["patoc", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Args::try_parse_from(["patoc"]).is_err());
    }

    #[test]
    fn test_render_with_out() {
        let args = Args::parse_from(["patoc", "render", "page.html", "--out", "rendered.html"]);
        assert_eq!(
            args.command,
            Command::Render {
                file: PathBuf::from("page.html"),
                out: Some(PathBuf::from("rendered.html")),
            }
        );
        assert_eq!(args.config, None);
        assert!(!args.verbose);
    }

    #[test]
    fn test_outline_defaults_to_text() {
        let args = Args::parse_from(["patoc", "outline", "page.html"]);
        assert_eq!(
            args.command,
            Command::Outline {
                file: PathBuf::from("page.html"),
                levels: None,
                format: OutlineFormat::Text,
            }
        );
    }

    #[test]
    fn test_outline_json_with_levels() {
        let args = Args::parse_from(["patoc", "outline", "page.html", "--format", "json", "--levels", "h2,h4"]);
        assert!(matches!(
            args.command,
            Command::Outline { format: OutlineFormat::Json, levels: Some(ref l), .. } if l == "h2,h4"
        ));
    }

    #[test]
    fn test_outline_rejects_unknown_format() {
        assert!(Args::try_parse_from(["patoc", "outline", "page.html", "--format", "yaml"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "patoc",
            "simulate",
            "scroll.json",
            "--config",
            "custom.toml",
            "--content-selector",
            "main",
            "-v",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(args.content_selector, Some("main".to_string()));
        assert!(args.verbose);
    }

    #[test]
    fn test_container_flags_become_overrides() {
        let args = Args::parse_from(["patoc", "container", "--levels", "h3", "--no-indent"]);
        assert_eq!(
            args.overrides(),
            CliOverrides {
                content_selector: None,
                levels: Some("h3".to_string()),
                indentation: Some(false),
            }
        );
    }

    #[test]
    fn test_container_overrides_flow_through_config_precedence_chain() {
        let args = Args::parse_from(["patoc", "container", "--levels", "h4"]);
        let config = config::apply_cli_overrides(config::merge_config(None), args.overrides());

        let settings = config.widget_settings().unwrap();
        assert_eq!(settings.levels, "h4".parse::<patoc::model::HeadingLevelSet>().unwrap());
        assert!(settings.indentation, "Indentation is kept without --no-indent");
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use assayer_core::config_file::{self, ConfigFile, DEFAULT_EXPORT_FILE};
use assayer_ingest::LoadOptions;
use assayer_reporting::ExportFormat;

mod output;

use output::ColorMode;

/// Analytical Reviewer - Flag missing HPLC, LC-MS, FTIR and DSC method details in research PDFs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the platform/.assayer.toml cascade
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Review the methods section of a PDF (or pre-extracted .txt) file
    Check {
        /// Path to the PDF or .txt file to review
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to output log file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of methods-section characters to show in the preview
        #[arg(long)]
        preview_chars: Option<usize>,

        /// Export findings (default path: review_findings.csv)
        #[arg(long, value_name = "PATH")]
        export: Option<Option<PathBuf>>,

        /// Export format: csv, json, markdown or text (default: from extension, else csv)
        #[arg(long)]
        format: Option<String>,

        /// Print the located methods section in full and skip the checks
        #[arg(long)]
        section_only: bool,
    },

    /// List the built-in rule set
    Rules {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => config_file::read_config(path)?,
        None => config_file::load_config(),
    };

    match cli.command {
        Command::Check {
            file_path,
            no_color,
            output,
            preview_chars,
            export,
            format,
            section_only,
        } => {
            if section_only {
                section_only_check(&file_path, no_color, output, &config)
            } else {
                check(
                    &file_path,
                    no_color,
                    output,
                    preview_chars,
                    export,
                    format,
                    &config,
                )
            }
        }
        Command::Rules { no_color } => {
            let color = ColorMode(!no_color && config.color());
            output::print_rules(&mut std::io::stdout(), color)?;
            Ok(())
        }
    }
}

/// Install a stderr subscriber when `--verbose` or `RUST_LOG` asks for logs.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !verbose && !has_rust_log {
        return Ok(());
    }

    let mut filter = EnvFilter::from_default_env();
    if verbose {
        for target in [
            "assayer_core",
            "assayer_parsing",
            "assayer_pdf_mupdf",
            "assayer_ingest",
            "assayer",
        ] {
            filter = filter.add_directive(format!("{target}=debug").parse()?);
        }
    }
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn open_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    })
}

fn display_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string())
}

/// Read the input with a spinner on stderr (hidden when not a terminal).
fn load_with_spinner(file_path: &Path, config: &ConfigFile) -> anyhow::Result<String> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Extracting and analyzing...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = assayer_ingest::load_document(file_path, &LoadOptions::from_config(config));
    spinner.finish_and_clear();

    result.with_context(|| format!("could not read {}", file_path.display()))
}

#[allow(clippy::too_many_arguments)]
fn check(
    file_path: &Path,
    no_color: bool,
    output: Option<PathBuf>,
    preview_chars: Option<usize>,
    export: Option<Option<PathBuf>>,
    format: Option<String>,
    config: &ConfigFile,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > config file > defaults
    let use_color = !no_color && output.is_none() && config.color();
    let color = ColorMode(use_color);
    let preview_chars = preview_chars.unwrap_or_else(|| config.preview_chars());

    let export_target = export.map(|p| {
        p.or_else(|| config.export_path().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE))
    });
    let export_format = resolve_export_format(
        format.as_deref().or(config.export_format()),
        export_target.as_deref(),
    )?;
    tracing::debug!(
        preview_chars,
        export = ?export_target,
        format = export_format.label(),
        "resolved check options"
    );

    let mut writer = open_writer(output.as_deref())?;

    let text = load_with_spinner(file_path, config)?;
    let review = assayer_parsing::review_text(&text);

    output::print_extraction_summary(
        &mut writer,
        &display_name(file_path),
        &review.section,
        review.methods_section.chars().count(),
        color,
    )?;
    output::print_preview(&mut writer, &review.methods_section, preview_chars, color)?;
    output::print_findings(&mut writer, &review.outcome, color)?;

    if let Some(path) = export_target {
        match review.outcome.findings() {
            [] => writeln!(writer, "Nothing to export.")?,
            findings => {
                assayer_reporting::export_findings(findings, export_format, &path)?;
                output::print_export_done(&mut writer, &path, export_format, color)?;
            }
        }
    }

    output::print_summary(&mut writer, &review.outcome, color)?;
    Ok(())
}

fn resolve_export_format(
    requested: Option<&str>,
    path: Option<&Path>,
) -> anyhow::Result<ExportFormat> {
    if let Some(name) = requested {
        return name.parse::<ExportFormat>().map_err(anyhow::Error::msg);
    }
    Ok(path.and_then(ExportFormat::from_path).unwrap_or_default())
}

fn section_only_check(
    file_path: &Path,
    no_color: bool,
    output: Option<PathBuf>,
    config: &ConfigFile,
) -> anyhow::Result<()> {
    let color = ColorMode(!no_color && output.is_none() && config.color());
    let mut writer = open_writer(output.as_deref())?;

    let text = load_with_spinner(file_path, config)?;
    let located = assayer_parsing::locate_methods_section(&text);

    output::print_section(&mut writer, &display_name(file_path), located.as_ref(), &text, color)?;
    Ok(())
}

//! formdef: inspect form definitions from the shell
//!
//! ```bash
//! formdef check form.json
//! formdef validate form.json values.json
//! formdef plan form.json --values values.json --outline
//! formdef transform form.json phone "5551234567"
//! formdef templates sales
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formdef_core::FormdefConfig;
use formdef_transform::AffixSelection;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{PlanFormat, Report};

#[derive(Parser)]
#[command(name = "formdef")]
#[command(version)]
#[command(about = "Check, validate and preview dynamic form definitions", long_about = None)]
struct Cli {
    /// Config profile: standalone, sales or asset
    #[arg(long, short, global = true)]
    profile: Option<String>,

    /// YAML config file (overrides --profile)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a definition and report whether it can be published
    Check { form: PathBuf },
    /// Validate values against a definition; exits 1 when any field fails
    Validate { form: PathBuf, values: PathBuf },
    /// Print the render plan
    Plan {
        form: PathBuf,
        /// Current values (also fills in per-field errors)
        #[arg(long)]
        values: Option<PathBuf>,
        /// Plain-text outline instead of JSON
        #[arg(long)]
        outline: bool,
        /// YAML file of outline templates
        #[arg(long, requires = "outline")]
        templates: Option<PathBuf>,
    },
    /// Run the input pipeline for one field and print the stored value
    Transform {
        form: PathBuf,
        field_id: String,
        raw: String,
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long)]
        suffix: Option<String>,
        /// Include case transforms deferred until submit
        #[arg(long)]
        commit: bool,
    },
    /// List the field templates a surface offers
    Templates {
        surface: String,
        /// Extra YAML catalog merged over the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("FORMDEF_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_opt(path: Option<&PathBuf>) -> Result<Option<String>> {
    path.map(|p| read(p)).transpose()
}

fn load_config(cli: &Cli) -> Result<FormdefConfig> {
    let config = match (&cli.config, &cli.profile) {
        (Some(path), _) => FormdefConfig::load(path)?,
        (None, Some(profile)) => FormdefConfig::for_profile(profile),
        (None, None) => FormdefConfig::default(),
    };
    let config = config.with_env_overrides()?;
    tracing::debug!(profile = %config.profile, cap = ?config.field_cap, "config loaded");
    Ok(config)
}

fn run(cli: Cli) -> Result<Report> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Check { form } => commands::check(&read(&form)?, &config),
        Commands::Validate { form, values } => commands::validate(&read(&form)?, &read(&values)?, &config),
        Commands::Plan {
            form,
            values,
            outline,
            templates,
        } => {
            let values = read_opt(values.as_ref())?;
            let templates = read_opt(templates.as_ref())?;
            let format = if outline {
                PlanFormat::Outline {
                    templates: templates.as_deref(),
                }
            } else {
                PlanFormat::Json
            };
            commands::plan(&read(&form)?, values.as_deref(), format, &config)
        }
        Commands::Transform {
            form,
            field_id,
            raw,
            prefix,
            suffix,
            commit,
        } => {
            let selection = AffixSelection { prefix, suffix };
            commands::transform(&read(&form)?, &field_id, &raw, &selection, commit, &config)
        }
        Commands::Templates { surface, catalog } => {
            let catalog = read_opt(catalog.as_ref())?;
            commands::templates(&surface, catalog.as_deref())
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(report) => {
            println!("{}", report.output);
            if report.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshtally CLI

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use meshtally::cli::Reporter;
use meshtally::io;
use meshtally::scan::{aggregate_all, MetadataStore, ModelReport, ScanReport, Scanner};
use meshtally::trial::{FileStore, TrialGate};
use meshtally::{MaterialClassifier, MeshtallyConfig, SceneNode, SceneUnit};
use meshtally::units::Dimensions;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshtally")]
#[command(about = "Meshtally - mesh metrics and material take-off", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./meshtally.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure and classify every part of one or more models
    Scan {
        /// Model files (.json, .stl) or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Scene unit (m, cm, mm); overrides the unit declared by the model
        #[arg(short, long)]
        unit: Option<String>,

        /// List every part
        #[arg(short, long)]
        parts: bool,

        /// Write the scan report as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Classify a single part from its name and dimensions in millimeters
    Classify {
        /// Part name
        #[arg(short, long, default_value = "")]
        name: String,

        length: f64,
        width: f64,
        height: f64,
    },

    /// Manage the local trial
    Trial {
        #[command(subcommand)]
        action: TrialAction,

        /// Trial state file
        #[arg(long, value_name = "FILE")]
        store: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Clone, Copy)]
enum TrialAction {
    /// Show the trial state
    Status,
    /// Start the trial window
    Start,
    /// Clear all trial state
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = MeshtallyConfig::from_file(path)?;
            config.apply_env()?;
            config
        }
        None => MeshtallyConfig::load()?,
    };
    config.verbose |= cli.verbose;
    init_tracing(config.verbose);

    let result = match cli.command {
        Commands::Scan { inputs, unit, parts, json } => {
            scan_command(&config, &inputs, unit.as_deref(), parts, json.as_deref())
        }
        Commands::Classify { name, length, width, height } => {
            classify_command(&config, &name, length, width, height);
            Ok(())
        }
        Commands::Trial { action, store } => {
            if let Some(store) = store {
                config.trial.store = store;
            }
            trial_command(&config, action)
        }
        Commands::Version => {
            println!("Meshtally v{}", meshtally::VERSION);
            Ok(())
        }
    };

    if let Err(err) = result {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "meshtally=debug" } else { "meshtally=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct LoadedModels {
    source: PathBuf,
    unit: SceneUnit,
    models: Vec<SceneNode>,
}

fn load_all(files: &[PathBuf], unit_override: Option<SceneUnit>, config: &MeshtallyConfig) -> Result<Vec<LoadedModels>> {
    let pb = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut loader = io::ModelLoader::new();
    let mut loaded = Vec::with_capacity(files.len());
    for file in files {
        match loader.load(file) {
            Ok(scene) => loaded.push(LoadedModels {
                source: file.clone(),
                unit: unit_override.or(scene.unit).unwrap_or(config.unit),
                models: scene.models,
            }),
            Err(err) => {
                tracing::warn!("Skipping {}: {}", file.display(), err);
            }
        }
        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(loaded)
}

fn scan_command(
    config: &MeshtallyConfig,
    inputs: &[PathBuf],
    unit: Option<&str>,
    show_parts: bool,
    json: Option<&Path>,
) -> Result<()> {
    let unit_override = unit
        .map(|u| u.parse::<SceneUnit>())
        .transpose()
        .context("Invalid --unit")?;

    let files = io::discover_models(inputs)?;
    if files.is_empty() {
        Reporter::report_warning("No model files found");
    }

    let loaded = load_all(&files, unit_override, config)?;
    let reporter = Reporter::new(show_parts);
    let mut store = MetadataStore::new();
    let mut all_models = Vec::new();

    for batch in loaded {
        let scanner = Scanner::from_config(config).with_unit(batch.unit);
        for model in &batch.models {
            let start = Instant::now();
            scanner.scan(model, &mut store);
            let report = ModelReport::collect(model, &store);
            reporter.report_model(&batch.source.display().to_string(), &report, start.elapsed());
        }
        all_models.extend(batch.models);
    }

    let mut presenter = reporter;
    let materials = aggregate_all(&all_models, &store, &config.materials, &mut presenter);

    if let Some(path) = json {
        let report = ScanReport::new(unit_override.unwrap_or(config.unit), &all_models, &store, materials);
        io::export_report_json(&report, path)?;
        Reporter::success(&format!("Report written to {}", path.display()));
    }

    Ok(())
}

fn classify_command(config: &MeshtallyConfig, name: &str, length: f64, width: f64, height: f64) {
    let classifier = MaterialClassifier::new(config.classifier.clone());
    let dimensions = Dimensions::new(length, width, height);
    let category = classifier.classify(name, &dimensions);
    Reporter::report_classification(name, &dimensions, category);
}

fn trial_command(config: &MeshtallyConfig, action: TrialAction) -> Result<()> {
    let store = FileStore::open(&config.trial.store)?;
    let mut gate = TrialGate::new(store).with_days(config.trial.days);
    let now = Utc::now();

    match action {
        TrialAction::Status => Reporter::report_trial(&gate.status(now)?),
        TrialAction::Start => Reporter::report_trial_start(&gate.start(now)?),
        TrialAction::Reset => {
            gate.reset()?;
            Reporter::success("Trial state cleared");
        }
    }
    Ok(())
}

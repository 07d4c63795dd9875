// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::materials::MaterialCategory;
use crate::scan::{MaterialReport, ModelReport, ResultsPresenter};
use crate::trial::{TrialStart, TrialStatus};
use crate::units::Dimensions;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
#[derive(Debug, Default, Clone, Copy)]
pub struct Reporter {
    /// List every part, not only model totals
    pub show_parts: bool,
}

impl Reporter {
    pub fn new(show_parts: bool) -> Self {
        Self { show_parts }
    }

    fn rule() -> ColoredString {
        "━".repeat(80).bright_black()
    }

    /// Report one scanned model
    pub fn report_model(&self, source: &str, model: &ModelReport, duration: Duration) {
        println!("\n{}", Self::rule());
        println!("{} {}", "Model:".bold(), model.name.cyan());
        println!("  {} {}", "Source:".bright_black(), source);
        println!("{}", Self::rule());

        if let Some(totals) = &model.totals {
            println!(
                "  {} {}",
                "Parts:".bright_black(),
                totals.part_count.to_string().cyan()
            );
            println!(
                "  {} {} {}",
                "Area:".bright_black(),
                format!("{:.3}", totals.calculation_value).cyan(),
                totals.calculation_unit
            );
        }
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );

        if self.show_parts {
            println!("\n{}", "Parts:".bold());
            for part in &model.parts {
                let metadata = &part.metadata;
                let name = if part.name.is_empty() { part.id.as_str() } else { part.name.as_str() };
                println!(
                    "  {:<32} {:<8} {:>14} {:<3} {}",
                    name,
                    Self::category_label(metadata.material_type()),
                    format!("{:.3}", metadata.calculation_value()),
                    metadata.calculation_unit(),
                    Self::format_dimensions(&metadata.dimensions).bright_black()
                );
            }
        }
    }

    /// Report aggregated material totals
    pub fn report_totals(report: &MaterialReport) {
        println!("\n{}", Self::rule());
        println!("{}", "Material totals".bold());
        println!("{}", Self::rule());

        if !report.has_results() {
            println!(
                "  {}",
                "No materials configured or no model loaded with calculation data".yellow()
            );
        }
        for total in &report.formatted {
            println!(
                "  {:<20} {:>14} {}",
                format!("{}:", total.key).bold(),
                total.value.bright_cyan().bold(),
                total.unit.bright_black()
            );
        }
        println!("{}", Self::rule());
    }

    /// Report a single classification
    pub fn report_classification(name: &str, dimensions: &Dimensions, category: Option<MaterialCategory>) {
        let label = match category {
            Some(category) => Self::category_label(category),
            None => "unclassified".yellow(),
        };
        let name = if name.is_empty() { "<unnamed>" } else { name };
        println!(
            "{} {} {} {}",
            "Part:".bold(),
            name.cyan(),
            Self::format_dimensions(dimensions).bright_black(),
            label
        );
    }

    /// Report trial state
    pub fn report_trial(status: &TrialStatus) {
        let expiration = status
            .expiration
            .map(|e| e.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());

        if status.active {
            println!(
                "{} {}",
                "✅".green(),
                format!(
                    "Local trial ACTIVE. Expires on {}, about {} days left.",
                    expiration, status.days_left
                )
                .green()
            );
        } else if status.started {
            println!(
                "{} {}",
                "❌".red(),
                format!("Trial period used and EXPIRED on {}.", expiration).red().bold()
            );
        } else {
            println!(
                "{} {}",
                "ℹ️".bright_blue(),
                format!("No active access. Start a {}-day trial with `trial start`.", status.days_left)
            );
        }
    }

    pub fn report_trial_start(outcome: &TrialStart) {
        if let TrialStart::AlreadyActive(_) = outcome {
            Self::report_info("The trial is already active");
        }
        Self::report_trial(outcome.status());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    fn category_label(category: MaterialCategory) -> ColoredString {
        match category {
            MaterialCategory::Sheet => "sheet".blue(),
            MaterialCategory::Volume => "volume".magenta(),
            MaterialCategory::Linear => "linear".green(),
            MaterialCategory::Unit => "unit".yellow(),
        }
    }

    fn format_dimensions(dimensions: &Dimensions) -> String {
        format!(
            "{:.1} × {:.1} × {:.1} mm",
            dimensions.length, dimensions.width, dimensions.height
        )
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}

impl ResultsPresenter for Reporter {
    fn present(&mut self, report: &MaterialReport) {
        Self::report_totals(report);
    }
}

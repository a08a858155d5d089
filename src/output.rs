//! The module responsible for writing simulation results.
use crate::metrics::{ScenarioSummary, check_unit_cost, hardware_capacity};
use crate::simulation::{EmissionDataPoint, ModelResults};
use crate::units::MoneyPerHour;
use anyhow::Result;
use itertools::Itertools;
use serde::Serialize;
use std::io::Write;

/// Identifies the scenario in a row of the emissions CSV output.
///
/// This will be written along with an [`EmissionDataPoint`].
#[derive(Serialize)]
struct ScenarioColumn<'a> {
    scenario: &'a str,
}

/// Derived metrics written alongside each [`EmissionDataPoint`]
#[derive(Serialize)]
struct DerivedColumns {
    hardware_capacity: f64,
}

/// Write the daily results of every scenario as CSV.
///
/// # Arguments
///
/// * `writer` - Where to write the CSV data
/// * `results` - The results to write
/// * `unit_cost_per_hour` - Hourly hardware cost used for the `hardware_capacity` column
pub fn write_emissions_csv<W: Write>(
    writer: W,
    results: &[ModelResults],
    unit_cost_per_hour: MoneyPerHour,
) -> Result<()> {
    check_unit_cost(unit_cost_per_hour)?;

    let mut writer = csv::Writer::from_writer(writer);
    for result in results {
        let scenario = ScenarioColumn {
            scenario: result.scenario(),
        };
        for point in result.data_points() {
            let derived = DerivedColumns {
                hardware_capacity: hardware_capacity(point.usd_value_emitted, unit_cost_per_hour),
            };
            writer.serialize((&scenario, point, derived))?;
        }
    }
    writer.flush()?;

    Ok(())
}

/// Format a large number with a K/M/B suffix
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.1}")
    }
}

/// Format a dollar amount with a K/M/B suffix
pub fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_number(-value))
    } else {
        format!("${}", format_number(value))
    }
}

/// Render a single summary as a row of the summary table
fn summary_row(summary: &ScenarioSummary) -> String {
    let price_change = summary
        .price_change_percent
        .map_or_else(|| "n/a".to_string(), |p| format!("{p:+.0}%"));

    format!(
        "{:<16} {:>12} {:>12} {:>10.2}% {:>9.1}% {:>6} {:>10}",
        summary.scenario,
        format_number(summary.total_tokens_emitted.value()),
        format_currency(summary.total_usd_value.value()),
        summary.final_inflation_rate,
        summary.emitted_share.value() * 100.0,
        format!("{}y", summary.duration_years),
        price_change
    )
}

/// Write a table summarising each scenario
pub fn write_summary_table<W: Write>(mut writer: W, summaries: &[ScenarioSummary]) -> Result<()> {
    writeln!(
        writer,
        "{:<16} {:>12} {:>12} {:>11} {:>10} {:>6} {:>10}",
        "Scenario", "Tokens", "Value", "Final rate", "Emitted", "Span", "Price"
    )?;
    writeln!(writer, "{}", summaries.iter().map(summary_row).join("\n"))?;

    Ok(())
}

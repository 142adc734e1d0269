use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::{RaceAggregate, RaceRecord, StintPlan};

/// Everything a report renders.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub config: &'a str,
    pub plan: &'a StintPlan,
    pub records: &'a [RaceRecord],
    pub aggregate: Option<&'a RaceAggregate>,
}

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &RunReport<'_>,
    verbose: bool,
    elapsed: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Race Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===============".cyan())?;
    writeln!(out, "Config: {}", report.config)?;
    writeln!(
        out,
        "Plan: {} laps per stint, tyres every {} stop(s), fuel {}",
        report.plan.stint_laps,
        report.plan.tyre_every,
        report
            .plan
            .fuel_per_stop
            .map_or_else(|| "top-off".to_string(), |liters| format!("{liters:.1} L"))
    )?;
    writeln!(out)?;

    for record in report.records {
        let status = if record.truncated {
            "⚠️  CAPPED".yellow()
        } else {
            "🏁 FLAG".green()
        };
        writeln!(out, "{} seed {}", status, record.seed.to_string().bold())?;
        writeln!(
            out,
            "   Laps: {} | Stops: {} | Tyre sets: {}",
            record.laps, record.pit_stops, record.tyre_changes
        )?;
        writeln!(
            out,
            "   Fastest: {} | Average: {} | Remaining: {}",
            record.fastest_lap.to_string().green(),
            record.average_lap,
            record.final_remaining
        )?;
        if verbose {
            let stints: Vec<String> = record.stints.iter().map(ToString::to_string).collect();
            writeln!(out, "   Stints: {}", stints.join(" / "))?;
            writeln!(
                out,
                "   Fuel added: {:.1} L | Noise draws: {}",
                record.fuel_added, record.noise_draws
            )?;
        }
        writeln!(out)?;
    }

    if let Some(aggregate) = report.aggregate {
        writeln!(out, "{}", "⚡ Across Seeds".bright_yellow().bold())?;
        writeln!(out, "{}", "==============".yellow())?;
        writeln!(out, "Runs: {}", aggregate.runs)?;
        writeln!(
            out,
            "Laps: mean {:.1} (min {}, max {})",
            aggregate.mean_laps, aggregate.min_laps, aggregate.max_laps
        )?;
        writeln!(out, "Mean stops: {:.1}", aggregate.mean_pit_stops)?;
        writeln!(out, "Best lap: {}", aggregate.best_lap)?;
        writeln!(out, "Mean average lap: {}", aggregate.mean_average_lap)?;
    }
    writeln!(out, "Total time: {elapsed:?}")?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &RunReport<'_>) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &RunReport<'_>) -> Result<()> {
    writeln!(out, "# Stint Simulation Results\n")?;
    writeln!(out, "- **Config**: {}", report.config)?;
    writeln!(out, "- **Stint laps**: {}", report.plan.stint_laps)?;
    writeln!(out, "- **Tyres every**: {} stop(s)\n", report.plan.tyre_every)?;

    writeln!(out, "## Runs\n")?;
    writeln!(out, "| Seed | Laps | Stops | Fastest | Average | Remaining |")?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for record in report.records {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            record.seed,
            record.laps,
            record.pit_stops,
            record.fastest_lap,
            record.average_lap,
            record.final_remaining
        )?;
    }

    if let Some(aggregate) = report.aggregate {
        writeln!(out, "\n## Summary\n")?;
        writeln!(out, "- **Runs**: {}", aggregate.runs)?;
        writeln!(out, "- **Mean laps**: {:.1}", aggregate.mean_laps)?;
        writeln!(out, "- **Mean stops**: {:.1}", aggregate.mean_pit_stops)?;
        writeln!(out, "- **Best lap**: {}", aggregate.best_lap)?;
    }
    Ok(())
}

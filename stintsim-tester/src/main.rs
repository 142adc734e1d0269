mod logic;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::reports::{
    RunReport, generate_console_report, generate_json_report, generate_markdown_report,
};
use logic::{
    BUILTIN_PRESET, FileLoader, RaceRecord, StintPlan, aggregate_races, resolve_seed_inputs,
    run_race,
};
use stintsim_core::ConfigLoader;
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored console summary
    Console,
    /// Pretty-printed JSON
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "stintsim-tester", version = "0.1.0")]
#[command(about = "Runs a fixed pit plan through the stint simulator over one or more seeds")]
struct Args {
    /// Simulation configuration JSON (defaults to the bundled 6h preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seeds to run (comma-separated; `config` uses the configured seed)
    #[arg(long, default_value = "config")]
    seeds: String,

    /// Laps per stint, in-lap included; fuel range may shorten it
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..))]
    stint_laps: u32,

    /// Change tyres on every n-th stop (0 = never)
    #[arg(long, default_value_t = 2)]
    tyre_every: u32,

    /// Liters added per stop (defaults to a full top-off)
    #[arg(long, value_parser = parse_liters)]
    fuel: Option<f64>,

    /// Stop a run after this many laps even if the clock has not run out
    #[arg(long, default_value_t = 10_000)]
    max_laps: u32,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn plan(&self) -> StintPlan {
        StintPlan {
            stint_laps: self.stint_laps,
            tyre_every: self.tyre_every,
            fuel_per_stop: self.fuel,
            max_laps: self.max_laps,
        }
    }

    fn config_name(&self) -> String {
        self.config.as_ref().map_or_else(
            || BUILTIN_PRESET.to_string(),
            |path| path.display().to_string(),
        )
    }
}

fn parse_liters(raw: &str) -> Result<f64, String> {
    let liters: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !liters.is_finite() || liters < 0.0 {
        return Err(format!("fuel must be a finite, non-negative amount (got {raw})"));
    }
    Ok(liters)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let config_name = args.config_name();
    let config = FileLoader
        .load_config(&config_name)
        .with_context(|| format!("loading configuration {config_name}"))?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds), config.seed)?;
    let plan = args.plan();

    let records = run_seeds(&config_name, &seeds, &plan)?;
    let aggregate = aggregate_races(&records);
    let report = RunReport {
        config: &config_name,
        plan: &plan,
        records: &records,
        aggregate: aggregate.as_ref(),
    };

    write_report(&args, &report, start_time)
}

fn announce_banner() {
    println!("{}", "🏎️  Stint Simulation Tester".bright_cyan().bold());
    println!("{}", "============================".cyan());
}

fn run_seeds(config_name: &str, seeds: &[u64], plan: &StintPlan) -> Result<Vec<RaceRecord>> {
    let mut records = Vec::with_capacity(seeds.len());
    for &seed in seeds {
        // Fresh car and race per seed; runs never share state.
        let mut sim = FileLoader
            .load_simulation(config_name, seed)
            .with_context(|| format!("building simulation for seed {seed}"))?;
        let record = run_race(&mut sim, plan, seed);
        log::info!(
            "seed {seed}: {} laps, {} stops, remaining {}",
            record.laps,
            record.pit_stops,
            record.final_remaining
        );
        records.push(record);
    }
    Ok(records)
}

fn write_report(args: &Args, report: &RunReport<'_>, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => generate_json_report(output_target.writer(), report)?,
        ReportFormat::Markdown => generate_markdown_report(output_target.writer(), report)?,
        ReportFormat::Console => generate_console_report(
            output_target.writer(),
            report,
            args.verbose,
            start_time.elapsed(),
        )?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

use serde::Serialize;
use stintsim_core::{LapKind, Simulation, Time};

/// Fixed pit plan: pit after a set number of laps or when fuel runs short.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StintPlan {
    /// Laps per stint including the in-lap
    pub stint_laps: u32,
    /// Fit new tyres on every n-th stop; 0 never changes them
    pub tyre_every: u32,
    /// Liters added per stop; `None` tops the tank off
    pub fuel_per_stop: Option<f64>,
    /// Safety stop for degenerate configurations
    pub max_laps: u32,
}

impl Default for StintPlan {
    fn default() -> Self {
        Self {
            stint_laps: 25,
            tyre_every: 2,
            fuel_per_stop: None,
            max_laps: 10_000,
        }
    }
}

impl StintPlan {
    fn tyres_due(&self, stop_number: u32) -> bool {
        self.tyre_every > 0 && stop_number % self.tyre_every == 0
    }
}

/// Outcome of one seeded race.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceRecord {
    pub seed: u64,
    pub laps: u32,
    pub pit_stops: u32,
    pub tyre_changes: u32,
    /// Laps driven in each stint, in order
    pub stints: Vec<u32>,
    pub fastest_lap: Time,
    pub average_lap: Time,
    pub total_time: Time,
    pub final_remaining: Time,
    pub fuel_added: f64,
    pub noise_draws: u64,
    /// True when the lap cap stopped the run before the clock did
    pub truncated: bool,
}

#[derive(Debug, Default)]
struct RaceTally {
    laps: Vec<(LapKind, Time)>,
    stints: Vec<u32>,
    pit_stops: u32,
    tyre_changes: u32,
    fuel_added: f64,
}

/// Drive `sim` to the flag with `plan`.
pub fn run_race(sim: &mut Simulation, plan: &StintPlan, seed: u64) -> RaceRecord {
    let stint_laps = plan.stint_laps.max(1);
    let mut tally = RaceTally::default();

    while !sim.race().is_finished() && sim.laps_raced() < plan.max_laps {
        let stint_done = sim.laps_in_stint() + 1 >= stint_laps;
        let fuel_short = sim.car().laps_of_fuel() <= 1;
        if !(stint_done || fuel_short) {
            tally.laps.push((LapKind::Normal, sim.normal_lap()));
            continue;
        }

        let stint_length = sim.laps_in_stint() + 1;
        tally.laps.push((LapKind::In, sim.in_lap()));
        tally.stints.push(stint_length);
        if sim.race().is_finished() {
            break;
        }

        let stop_number = tally.pit_stops + 1;
        let change_tyres = plan.tyres_due(stop_number);
        let room = sim.car().fuel_capacity() - sim.car().fuel();
        let fuel = plan
            .fuel_per_stop
            .filter(|liters| liters.is_finite())
            .unwrap_or(room)
            .clamp(0.0, room.max(0.0));
        log::info!(
            "seed {seed}: stop {stop_number} after lap {}, +{fuel:.1} L{}",
            sim.laps_raced(),
            if change_tyres { ", tyres" } else { "" }
        );
        tally.laps.push((LapKind::Out, sim.out_lap(fuel, change_tyres)));
        tally.pit_stops = stop_number;
        tally.fuel_added += fuel;
        if change_tyres {
            tally.tyre_changes += 1;
        }
    }

    if sim.laps_in_stint() > 0 {
        tally.stints.push(sim.laps_in_stint());
    }
    let truncated = !sim.race().is_finished();
    if truncated {
        log::warn!("seed {seed}: lap cap {} reached before the flag", plan.max_laps);
    }
    summarize(sim, tally, seed, truncated)
}

fn summarize(sim: &Simulation, tally: RaceTally, seed: u64, truncated: bool) -> RaceRecord {
    let total_time: Time = tally.laps.iter().map(|(_, lap)| *lap).sum();
    let laps = sim.laps_raced();
    let average_lap = if laps == 0 {
        Time::ZERO
    } else {
        total_time / f64::from(laps)
    };
    let fastest_lap = tally
        .laps
        .iter()
        .filter(|(kind, _)| *kind == LapKind::Normal)
        .map(|(_, lap)| *lap)
        .min()
        .unwrap_or(Time::ZERO);

    RaceRecord {
        seed,
        laps,
        pit_stops: tally.pit_stops,
        tyre_changes: tally.tyre_changes,
        stints: tally.stints,
        fastest_lap,
        average_lap,
        total_time,
        final_remaining: sim.race().remaining(),
        fuel_added: tally.fuel_added,
        noise_draws: sim.noise_draws(),
        truncated,
    }
}

/// Cross-seed summary of a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceAggregate {
    pub runs: usize,
    pub mean_laps: f64,
    pub min_laps: u32,
    pub max_laps: u32,
    pub mean_pit_stops: f64,
    pub best_lap: Time,
    pub mean_average_lap: Time,
}

#[must_use]
pub fn aggregate_races(records: &[RaceRecord]) -> Option<RaceAggregate> {
    if records.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let runs = records.len() as f64;
    let mean_laps = records.iter().map(|r| f64::from(r.laps)).sum::<f64>() / runs;
    let mean_pit_stops = records.iter().map(|r| f64::from(r.pit_stops)).sum::<f64>() / runs;
    let mean_average_lap = records.iter().map(|r| r.average_lap).sum::<Time>() / runs;

    Some(RaceAggregate {
        runs: records.len(),
        mean_laps,
        min_laps: records.iter().map(|r| r.laps).min().unwrap_or(0),
        max_laps: records.iter().map(|r| r.laps).max().unwrap_or(0),
        mean_pit_stops,
        best_lap: records.iter().map(|r| r.fastest_lap).min().unwrap_or(Time::ZERO),
        mean_average_lap,
    })
}

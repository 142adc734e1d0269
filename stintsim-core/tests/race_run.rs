use stintsim_core::{
    CarParameters, QuadraticEquation, RaceParameters, Simulation, SimulationConfig,
    SimulationSnapshot, Time,
};

fn quiet_simulation(curve: QuadraticEquation) -> Simulation {
    Simulation::new(
        Time::new(0, 1, 40.0, 0),
        0.0,
        RaceParameters::new(
            Time::from_hours(6),
            Time::from_seconds(20.0),
            Time::from_seconds(10.0),
            20,
            Time::from_millis(400),
        ),
        CarParameters::new(
            75.0,
            2.0,
            4.0,
            Time::from_millis(20),
            Time::from_seconds(20.0),
            curve,
        ),
        1,
    )
}

#[test]
fn deterministic_normal_lap_matches_model() {
    let mut sim = quiet_simulation(QuadraticEquation::new(0.002, 0.02, 0.3));
    sim.car_mut().set_fuel(25.0);
    let expected = sim.baseline_lap() + Time::from_millis(1_000) + sim.car().tyre_time_loss(0);
    assert_eq!(sim.normal_lap(), expected);
}

#[test]
fn remaining_time_tracks_every_lap() {
    let mut sim = quiet_simulation(QuadraticEquation::new(0.002, 0.02, 0.0));
    let mut laps = Vec::new();
    for _ in 0..10 {
        laps.push(sim.normal_lap());
    }
    laps.push(sim.in_lap());
    laps.push(sim.out_lap(40.0, true));
    for _ in 0..5 {
        laps.push(sim.normal_lap());
    }

    let driven: Time = laps.iter().copied().sum();
    assert_eq!(sim.race().remaining(), Time::from_hours(6) - driven);
    assert_eq!(sim.laps_raced(), 17);
    assert_eq!(sim.laps_in_stint(), 6);
    assert_eq!(sim.tyre_laps(), 5);
}

#[test]
fn pit_laps_cost_more_than_green_laps() {
    let mut sim = quiet_simulation(QuadraticEquation::new(0.0, 0.05, 0.0));
    let green = sim.normal_lap();
    let in_lap = sim.in_lap();
    let out_lap = sim.out_lap(8.0, true);
    assert!(in_lap > green);
    assert!(out_lap > in_lap);
}

#[test]
fn fixed_stints_run_the_clock_out() {
    let mut sim = quiet_simulation(QuadraticEquation::new(0.002, 0.02, 0.0));
    let stint = 17;
    let mut stops = 0;
    while !sim.race().is_finished() {
        if sim.laps_in_stint() + 1 == stint {
            sim.in_lap();
            if sim.race().is_finished() {
                break;
            }
            sim.out_lap(f64::INFINITY, stops % 2 == 1);
            stops += 1;
        } else {
            sim.normal_lap();
        }
        assert!(sim.car().fuel() >= 0.0);
        assert!(sim.car().fuel() <= sim.car().fuel_capacity());
    }
    assert!(sim.race().remaining() <= Time::ZERO);
    assert!(stops > 5);
    assert!(sim.laps_raced() > 180);
}

#[test]
fn running_dry_is_allowed() {
    let mut sim = quiet_simulation(QuadraticEquation::default());
    for _ in 0..20 {
        sim.normal_lap();
    }
    let fuel = sim.car().fuel();
    assert!(fuel < 0.0);
    assert!((sim.car_mut().set_fuel(-1.0) - fuel).abs() < f64::EPSILON);
}

#[test]
fn snapshot_serializes_for_branching() {
    let mut sim = SimulationConfig::load_from_static().build().unwrap();
    for _ in 0..5 {
        sim.normal_lap();
    }
    let snapshot = sim.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: SimulationSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, restored);

    sim.in_lap();
    sim.out_lap(30.0, true);
    sim.restore(&restored);
    assert_eq!(sim.snapshot(), snapshot);
}

#[test]
fn tyre_strategy_comparison_is_pure() {
    let sim = quiet_simulation(QuadraticEquation::new(0.1, 0.2, 0.0));
    let before = sim.snapshot();
    let long_run = sim.cumulative_tyre_loss(0, 30);
    let split_run = sim.cumulative_tyre_loss(0, 15) + sim.cumulative_tyre_loss(0, 15);
    assert!(split_run < long_run);
    assert_eq!(sim.cumulative_tyre_loss(2, 5), Time::from_seconds(4.7));
    assert_eq!(sim.snapshot(), before);
}

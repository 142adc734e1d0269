//! Lap-time prediction for a single car.
//!
//! Each lap operation computes a lap time, takes it off the race clock,
//! burns one lap of fuel and advances the lap counters before returning.
//! None of them is idempotent; use [`Simulation::snapshot`] and
//! [`Simulation::restore`] to branch a strategy search.
use rand::Rng;
use rand::rngs::SmallRng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::car::CarParameters;
use crate::race::RaceParameters;
use crate::rng::CountingRng;
use crate::time::Time;

/// Which lap operation produced a lap time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LapKind {
    Normal,
    In,
    Out,
}

/// Every mutable field of a running simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub fuel: f64,
    pub remaining: Time,
    pub laps_raced: u32,
    pub laps_in_stint: u32,
    pub tyre_laps: u32,
}

/// One car driven through a race, lap by lap.
#[derive(Debug, Clone)]
pub struct Simulation<R = CountingRng<SmallRng>> {
    baseline_lap: Time,
    driver_std_dev: f64,
    race: RaceParameters,
    car: CarParameters,
    rng: R,
    laps_raced: u32,
    laps_in_stint: u32,
    tyre_laps: u32,
}

impl Simulation {
    /// Create a simulation whose driver variance is drawn from a stream
    /// derived from `seed`.
    #[must_use]
    pub fn new(
        baseline_lap: Time,
        driver_std_dev: f64,
        race: RaceParameters,
        car: CarParameters,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            baseline_lap,
            driver_std_dev,
            race,
            car,
            CountingRng::driver_stream(seed),
        )
    }

    /// Number of random draws consumed so far.
    #[must_use]
    pub const fn noise_draws(&self) -> u64 {
        self.rng.draws()
    }
}

impl<R: Rng> Simulation<R> {
    /// Create a simulation over an arbitrary random source.
    ///
    /// A negative or non-finite standard deviation is treated as zero.
    #[must_use]
    pub fn with_rng(
        baseline_lap: Time,
        driver_std_dev: f64,
        race: RaceParameters,
        car: CarParameters,
        rng: R,
    ) -> Self {
        Self {
            baseline_lap,
            driver_std_dev: sanitize_std_dev(driver_std_dev),
            race,
            car,
            rng,
            laps_raced: 0,
            laps_in_stint: 0,
            tyre_laps: 0,
        }
    }

    /// One independent sample of driver variance, `N(0, σ²)` seconds.
    pub fn driver_noise(&mut self) -> Time {
        let z: f64 = self.rng.sample(StandardNormal);
        Time::from_seconds(z * self.driver_std_dev)
    }

    /// Green-flag lap on the current fuel load and tyres.
    pub fn normal_lap(&mut self) -> Time {
        let lap = self.running_lap_time();
        self.laps_in_stint += 1;
        self.tyre_laps += 1;
        self.finish_lap(lap, LapKind::Normal)
    }

    /// Lap ending in the pit lane; closes the current stint.
    pub fn in_lap(&mut self) -> Time {
        let lap = self.running_lap_time() + self.race.in_lap_time_loss();
        self.laps_in_stint = 0;
        self.tyre_laps += 1;
        self.finish_lap(lap, LapKind::In)
    }

    /// Lap leaving the pits after adding `fuel_to_add` liters and,
    /// optionally, fitting new tyres.
    ///
    /// Fuel gain is taken on the load the car arrived with. With a tyre
    /// change the out-lap wear term is that of a fresh set.
    pub fn out_lap(&mut self, fuel_to_add: f64, change_tyres: bool) -> Time {
        let mut lap = self.baseline_lap
            + self.car.fuel_time_gain()
            + self.driver_noise()
            + self.race.out_lap_time_loss();

        let fuel_before = self.car.fuel();
        let refuel = self.car.add_fuel(fuel_to_add);
        log::debug!(
            "lap {}: refuel {:.2} L -> {:.2} L in {refuel}",
            self.laps_raced + 1,
            fuel_before,
            self.car.fuel()
        );
        lap += refuel;

        if change_tyres {
            log::debug!(
                "lap {}: tyre change after {} laps",
                self.laps_raced + 1,
                self.tyre_laps
            );
            lap += self.car.tyre_change_time();
            self.tyre_laps = 0;
        }
        lap += self.car.tyre_time_loss(self.tyre_laps);

        self.laps_in_stint += 1;
        self.finish_lap(lap, LapKind::Out)
    }

    /// Total wear loss over tyre ages `from_lap..to_lap`. Pure query.
    #[must_use]
    pub fn cumulative_tyre_loss(&self, from_lap: u32, to_lap: u32) -> Time {
        (from_lap..to_lap)
            .map(|lap| self.car.tyre_time_loss(lap))
            .sum()
    }

    fn running_lap_time(&mut self) -> Time {
        self.baseline_lap
            + self.car.fuel_time_gain()
            + self.car.tyre_time_loss(self.tyre_laps)
            + self.driver_noise()
    }

    fn finish_lap(&mut self, lap: Time, kind: LapKind) -> Time {
        self.race.record_lap(lap);
        self.car.consume_lap_fuel();
        self.laps_raced += 1;
        log::trace!(
            "lap {} ({kind:?}): {lap}, fuel {:.2} L, tyres {} laps, remaining {}",
            self.laps_raced,
            self.car.fuel(),
            self.tyre_laps,
            self.race.remaining()
        );
        lap
    }

    #[must_use]
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            fuel: self.car.fuel(),
            remaining: self.race.remaining(),
            laps_raced: self.laps_raced,
            laps_in_stint: self.laps_in_stint,
            tyre_laps: self.tyre_laps,
        }
    }

    /// Rewind the deterministic state. The noise stream keeps advancing.
    ///
    /// The fuel level is restored as captured, including a negative level
    /// left by running dry.
    pub fn restore(&mut self, snapshot: &SimulationSnapshot) {
        self.car.restore_fuel(snapshot.fuel);
        self.race.set_remaining(snapshot.remaining);
        self.laps_raced = snapshot.laps_raced;
        self.laps_in_stint = snapshot.laps_in_stint;
        self.tyre_laps = snapshot.tyre_laps;
    }

    #[must_use]
    pub const fn baseline_lap(&self) -> Time {
        self.baseline_lap
    }

    #[must_use]
    pub const fn driver_std_dev(&self) -> f64 {
        self.driver_std_dev
    }

    #[must_use]
    pub const fn laps_raced(&self) -> u32 {
        self.laps_raced
    }

    #[must_use]
    pub const fn laps_in_stint(&self) -> u32 {
        self.laps_in_stint
    }

    #[must_use]
    pub const fn tyre_laps(&self) -> u32 {
        self.tyre_laps
    }

    #[must_use]
    pub const fn race(&self) -> &RaceParameters {
        &self.race
    }

    #[must_use]
    pub const fn car(&self) -> &CarParameters {
        &self.car
    }

    /// Mutable car access for strategy code, e.g. to start a run short-fuelled.
    pub const fn car_mut(&mut self) -> &mut CarParameters {
        &mut self.car
    }
}

fn sanitize_std_dev(std_dev: f64) -> f64 {
    if std_dev.is_finite() {
        std_dev.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degradation::QuadraticEquation;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn race() -> RaceParameters {
        RaceParameters::new(
            Time::from_hours(6),
            Time::from_seconds(20.0),
            Time::from_seconds(10.0),
            20,
            Time::from_millis(400),
        )
    }

    fn car(curve: QuadraticEquation) -> CarParameters {
        CarParameters::new(
            75.0,
            2.0,
            4.0,
            Time::from_millis(20),
            Time::from_seconds(20.0),
            curve,
        )
    }

    fn quiet_sim(curve: QuadraticEquation) -> Simulation<ChaCha8Rng> {
        Simulation::with_rng(
            Time::new(0, 1, 40.0, 0),
            0.0,
            race(),
            car(curve),
            ChaCha8Rng::seed_from_u64(11),
        )
    }

    #[test]
    fn normal_lap_adds_fuel_gain_and_wear() {
        let mut sim = quiet_sim(QuadraticEquation::new(0.0, 0.1, 0.5));
        sim.car_mut().set_fuel(25.0);

        let lap = sim.normal_lap();

        assert_eq!(
            lap,
            Time::new(0, 1, 40.0, 0) + Time::from_millis(1_000) + Time::from_millis(500)
        );
        assert_eq!(sim.race().remaining(), Time::from_hours(6) - lap);
        assert!((sim.car().fuel() - 21.0).abs() < f64::EPSILON);
        assert_eq!(
            (sim.laps_raced(), sim.laps_in_stint(), sim.tyre_laps()),
            (1, 1, 1)
        );
    }

    #[test]
    fn consecutive_laps_wear_tyres_and_lighten_car() {
        let mut sim = quiet_sim(QuadraticEquation::new(0.0, 0.1, 0.0));
        let first = sim.normal_lap();
        let second = sim.normal_lap();
        // 4 L burned adds 80 ms of fuel term, one more lap of wear adds 100 ms.
        assert_eq!(second - first, Time::from_millis(180));
    }

    #[test]
    fn in_lap_adds_pit_entry_loss_and_closes_stint() {
        let mut sim = quiet_sim(QuadraticEquation::new(0.0, 0.0, 0.0));
        sim.normal_lap();
        sim.normal_lap();
        let before = sim.snapshot();

        let lap = sim.in_lap();

        assert_eq!(
            lap,
            Time::new(0, 1, 40.0, 0) + Time::from_millis(160) + Time::from_seconds(10.0)
        );
        assert_eq!(sim.laps_in_stint(), 0);
        assert_eq!(sim.tyre_laps(), before.tyre_laps + 1);
        assert_eq!(sim.laps_raced(), 3);
    }

    #[test]
    fn out_lap_with_tyre_change_uses_fresh_tyre_wear() {
        let mut sim = quiet_sim(QuadraticEquation::new(0.0, 0.5, 0.25));
        for _ in 0..4 {
            sim.normal_lap();
        }
        sim.in_lap();
        assert!((sim.car().fuel() - 55.0).abs() < f64::EPSILON);

        let lap = sim.out_lap(20.0, true);

        // Fuel gain is taken before refuelling: 20 L short of full.
        let expected = Time::new(0, 1, 40.0, 0)
            + Time::from_millis(400)
            + Time::from_seconds(20.0)
            + Time::from_seconds(10.0)
            + Time::from_seconds(20.0)
            + Time::from_seconds(0.25);
        assert_eq!(lap, expected);
        assert_eq!(sim.tyre_laps(), 0);
        assert_eq!(sim.laps_in_stint(), 1);
        assert_eq!(sim.laps_raced(), 6);
        assert!((sim.car().fuel() - 71.0).abs() < f64::EPSILON);
    }

    #[test]
    fn out_lap_without_tyre_change_keeps_tyre_age() {
        let mut sim = quiet_sim(QuadraticEquation::new(0.0, 0.5, 0.0));
        sim.normal_lap();
        sim.in_lap();

        let lap = sim.out_lap(0.0, false);

        let expected = Time::new(0, 1, 40.0, 0)
            + Time::from_millis(160)
            + Time::from_seconds(20.0)
            + Time::from_seconds(1.0);
        assert_eq!(lap, expected);
        assert_eq!(sim.tyre_laps(), 2);
    }

    #[test]
    fn out_lap_overfill_tops_off() {
        let mut sim = quiet_sim(QuadraticEquation::default());
        sim.car_mut().set_fuel(25.0);
        let lap = sim.out_lap(500.0, false);
        // 50 L at 2 L/s is 25 s.
        let expected = Time::new(0, 1, 40.0, 0)
            + Time::from_millis(1_000)
            + Time::from_seconds(20.0)
            + Time::from_seconds(25.0);
        assert_eq!(lap, expected);
        assert!((sim.car().fuel() - 71.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cumulative_tyre_loss_is_half_open() {
        let sim = quiet_sim(QuadraticEquation::new(0.1, 0.2, 0.0));
        assert_eq!(sim.cumulative_tyre_loss(2, 5), Time::from_seconds(4.7));
        assert_eq!(sim.cumulative_tyre_loss(5, 5), Time::ZERO);
        assert_eq!(sim.cumulative_tyre_loss(6, 2), Time::ZERO);
        assert_eq!(sim.laps_raced(), 0);
    }

    #[test]
    fn zero_std_dev_gives_zero_noise() {
        let mut sim = quiet_sim(QuadraticEquation::default());
        assert_eq!(sim.driver_noise(), Time::ZERO);
    }

    #[test]
    fn invalid_std_dev_is_sanitized() {
        let sim = Simulation::with_rng(
            Time::ZERO,
            f64::NAN,
            race(),
            car(QuadraticEquation::default()),
            ChaCha8Rng::seed_from_u64(11),
        );
        assert!(sim.driver_std_dev().abs() < f64::EPSILON);
        let sim = Simulation::new(
            Time::ZERO,
            -0.3,
            race(),
            car(QuadraticEquation::default()),
            1,
        );
        assert!(sim.driver_std_dev().abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_restore_replays_deterministic_laps() {
        let mut sim = quiet_sim(QuadraticEquation::new(0.01, 0.05, 0.0));
        sim.normal_lap();
        sim.normal_lap();
        let snapshot = sim.snapshot();

        let first_branch = [sim.normal_lap(), sim.in_lap(), sim.out_lap(30.0, true)];
        let after_first = sim.snapshot();
        sim.restore(&snapshot);
        assert_eq!(sim.snapshot(), snapshot);
        let second_branch = [sim.normal_lap(), sim.in_lap(), sim.out_lap(30.0, true)];

        assert_eq!(first_branch, second_branch);
        assert_eq!(sim.snapshot(), after_first);
    }

    #[test]
    fn restore_keeps_a_dry_tank() {
        let mut sim = quiet_sim(QuadraticEquation::new(0.0, 0.1, 0.0));
        for _ in 0..19 {
            sim.normal_lap();
        }
        let snapshot = sim.snapshot();
        assert!((snapshot.fuel + 1.0).abs() < f64::EPSILON);

        let first = sim.normal_lap();
        sim.restore(&snapshot);
        assert!((sim.car().fuel() + 1.0).abs() < f64::EPSILON);
        assert_eq!(sim.snapshot(), snapshot);
        assert_eq!(sim.normal_lap(), first);
    }

    #[test]
    fn out_lap_saturates_on_unbounded_refuel_cost() {
        let stalled = CarParameters::new(
            75.0,
            0.0,
            4.0,
            Time::from_millis(20),
            Time::from_seconds(20.0),
            QuadraticEquation::default(),
        );
        let mut sim = Simulation::with_rng(
            Time::new(0, 1, 40.0, 0),
            0.0,
            race(),
            stalled,
            ChaCha8Rng::seed_from_u64(11),
        );
        sim.normal_lap();
        sim.in_lap();

        let lap = sim.out_lap(8.0, true);

        assert_eq!(lap, Time::from_millis(i64::MAX));
        assert!(sim.race().is_finished());
    }

    #[test]
    fn seeded_simulations_are_reproducible() {
        let build = |seed| {
            Simulation::new(
                Time::new(0, 1, 40.0, 0),
                0.2,
                race(),
                car(QuadraticEquation::default()),
                seed,
            )
        };
        let mut a = build(99);
        let mut b = build(99);
        for _ in 0..10 {
            assert_eq!(a.normal_lap(), b.normal_lap());
        }
        assert_eq!(a.noise_draws(), b.noise_draws());
        assert!(a.noise_draws() > 0);
    }

    #[test]
    fn noise_draws_stay_in_a_sane_window() {
        let mut sim = Simulation::new(
            Time::new(0, 1, 40.0, 0),
            0.2,
            race(),
            car(QuadraticEquation::default()),
            2024,
        );
        let noise = sim.driver_noise();
        assert!(noise > Time::from_seconds(-1.0));
        assert!(noise < Time::from_seconds(1.0));
    }
}

pub mod driver;
pub mod loader;
pub mod reports;
pub mod seeds;

pub use driver::{RaceAggregate, RaceRecord, StintPlan, aggregate_races, run_race};
pub use loader::{BUILTIN_PRESET, FileLoader};
pub use seeds::resolve_seed_inputs;

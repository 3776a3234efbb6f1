//! Tournament outcome forecasting.
//!
//! Projects, from a partially played four-group first phase, how often
//! each team reaches the second phase, the semifinals, the final and the
//! title, by playing the rest of the tournament out many times.

pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod first_phase;
pub mod knockout;
pub mod match_sim;
pub mod prediction;
pub mod ranking;
pub mod rng;
pub mod second_phase;
pub mod seeding;
pub mod snapshot;
pub mod standings;
pub mod store;
pub mod trial;
pub mod types;
pub mod win_probability;

pub use config::ForecastConfig;
pub use engine::{run_forecast, Forecast, ForecastEngine};
pub use error::{SimError, SimResult};
pub use prediction::PredictionRow;
pub use snapshot::TournamentSnapshot;

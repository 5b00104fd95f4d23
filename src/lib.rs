pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fast_read;
pub mod fingerprint;
pub mod grid;
pub mod layout;
pub mod location;
pub mod model;
pub mod orchestrator;
pub mod rules;
pub mod session;
pub mod timing;

pub use cache::{CacheEntry, ResultCache};
pub use config::Settings;
pub use errors::PricingError;
pub use fingerprint::Fingerprint;
pub use grid::{CellValue, CostGrid, GRID_COLS, GRID_ROWS};
pub use model::{
    ComputationMeta, ComputeSource, Feeding, Guarding, PricedLine, PricingInputs, PricingResult,
    Training, Transformer,
};
pub use orchestrator::Orchestrator;
pub use timing::{Phase, PhaseTimings, TimingRecorder};

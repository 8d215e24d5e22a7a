pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use self::core::{
    batch::{run_batch, BatchSummary},
    cache::{NoCache, ResultCache},
    engine::{compute_chart, BaziEngine},
};
pub use domain::model::{BaziChart, BirthInput, Element, Gender, Pillar, Stem, Strength};
pub use utils::error::{BaziError, Result};

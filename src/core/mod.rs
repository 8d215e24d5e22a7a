pub mod batch;
pub mod cache;
pub mod cycle;
pub mod elements;
pub mod engine;
pub mod favorable;
pub mod pillars;
pub mod report;

pub use crate::domain::model::{BaziChart, BirthInput, FourPillars, Pillar};
pub use crate::domain::ports::{ChartCache, ConfigProvider, OutputFormat};
pub use crate::utils::error::Result;

use crate::domain::model::{BaziChart, BirthInput};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Memoization store for finished charts.
///
/// Implementations must be safe to share between threads. Racing callers may
/// both compute the same key; whichever insert lands first is kept.
pub trait ChartCache: Send + Sync {
    fn get(&self, key: &BirthInput) -> Result<Option<Arc<BaziChart>>>;

    /// Stores `chart` unless the key is already present, and returns the stored value.
    fn insert(&self, key: BirthInput, chart: BaziChart) -> Result<Arc<BaziChart>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Failures from `compute` are returned as-is and never stored.
    fn get_or_compute<F>(&self, key: &BirthInput, compute: F) -> Result<Arc<BaziChart>>
    where
        F: FnOnce() -> Result<BaziChart>,
        Self: Sized,
    {
        if let Some(hit) = self.get(key)? {
            tracing::debug!(?key, "chart cache hit");
            return Ok(hit);
        }

        tracing::debug!(?key, "chart cache miss");
        let chart = compute()?;
        self.insert(*key, chart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn cache_enabled(&self) -> bool;
    fn output_format(&self) -> OutputFormat;
    fn pretty_json(&self) -> bool;
}

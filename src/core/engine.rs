use crate::core::cache::{NoCache, ResultCache};
use crate::core::elements::ElementAnalyzer;
use crate::core::favorable::FavorableElementSelector;
use crate::core::pillars::FourPillarsBuilder;
use crate::domain::model::{BaziChart, BirthInput};
use crate::domain::ports::ChartCache;
use crate::utils::error::Result;
use std::sync::Arc;

/// Runs the full pipeline (pillars, tally, strength, element selection) for one input.
///
/// Gender is carried in the input but takes no part in the computation.
pub fn compute_chart(input: &BirthInput) -> Result<BaziChart> {
    let pillars = FourPillarsBuilder::build(input.year, input.month, input.day, input.hour)?;
    let tally = ElementAnalyzer::tally(&pillars);
    let day_master = pillars.day_master();
    let strength = ElementAnalyzer::classify_strength(&tally, day_master);
    let selection = FavorableElementSelector::select(strength, day_master.element());

    tracing::debug!(
        day_master = %day_master,
        %strength,
        count = tally.count(day_master.element()),
        "classified day master"
    );

    Ok(BaziChart {
        year_pillar: pillars.year,
        month_pillar: pillars.month,
        day_pillar: pillars.day,
        hour_pillar: pillars.hour,
        five_elements: tally,
        day_master,
        strength,
        favorable_elements: selection.favorable,
        unfavorable_elements: selection.unfavorable,
    })
}

pub struct BaziEngine<C: ChartCache> {
    cache: C,
}

impl BaziEngine<ResultCache> {
    pub fn new() -> Self {
        Self::with_cache(ResultCache::new())
    }
}

impl Default for BaziEngine<ResultCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl BaziEngine<NoCache> {
    pub fn uncached() -> Self {
        Self::with_cache(NoCache)
    }
}

impl<C: ChartCache> BaziEngine<C> {
    pub fn with_cache(cache: C) -> Self {
        Self { cache }
    }

    /// Top-level entry point. Input errors come back as `Err`, never as a panic.
    pub fn calculate(&self, input: &BirthInput) -> Result<Arc<BaziChart>> {
        self.cache.get_or_compute(input, || compute_chart(input))
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

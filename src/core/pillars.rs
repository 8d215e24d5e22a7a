//! Four Pillars derivation from a Gregorian date and hour.
//!
//! Month pillars follow the Gregorian month rather than solar-term
//! boundaries, and the year pillar turns over on January 1st. Both are
//! deliberate approximations: exact boundaries need solar-term ephemeris data.

use crate::core::cycle;
use crate::domain::model::{Branch, FourPillars, Pillar, Stem};
use crate::utils::error::{BaziError, Result};
use chrono::{Datelike, NaiveDate};

/// A 甲子 year.
pub const ANCHOR_YEAR: i32 = 1984;

/// A 甲子 day: 2000-01-07.
pub const ANCHOR_DATE: (i32, u32, u32) = (2000, 1, 7);

/// First-month stem index per year-stem pair (甲乙, 丙丁, 戊己, 庚辛, 壬癸).
const MONTH_STEM_START: [i64; 5] = [2, 4, 6, 8, 0];

/// 子-hour stem index per day-stem pair.
const HOUR_STEM_START: [i64; 5] = [0, 2, 4, 6, 8];

/// Month branches start at 寅.
const FIRST_MONTH_BRANCH: i64 = 2;

pub struct FourPillarsBuilder;

impl FourPillarsBuilder {
    /// Validates the raw input and derives all four pillars.
    ///
    /// This is the only place birth data is checked; the per-pillar helpers
    /// below assume validated values.
    pub fn build(year: i32, month: i32, day: i32, hour: i32) -> Result<FourPillars> {
        let hour = validate_hour(hour)?;
        let date = validate_date(year, month, day)?;

        let year_pillar = Self::year_pillar(date.year());
        let month_pillar = Self::month_pillar(year_pillar.stem, date.month())?;
        let day_pillar = Self::day_pillar(date)?;
        let hour_pillar = Self::hour_pillar(day_pillar.stem, hour)?;

        tracing::debug!(
            %date,
            hour,
            year = %year_pillar,
            month = %month_pillar,
            day = %day_pillar,
            hour_pillar = %hour_pillar,
            "derived four pillars"
        );

        Ok(FourPillars {
            year: year_pillar,
            month: month_pillar,
            day: day_pillar,
            hour: hour_pillar,
        })
    }

    pub fn year_pillar(year: i32) -> Pillar {
        let offset = (year as i64 - ANCHOR_YEAR as i64).rem_euclid(cycle::SEXAGENARY_CYCLE);
        cycle::pillar_at(offset)
    }

    /// `month` is the Gregorian month, 1-12.
    pub fn month_pillar(year_stem: Stem, month: u32) -> Result<Pillar> {
        let start = MONTH_STEM_START[year_stem.pair_group()];
        let month_offset = month as i64 - 1;
        pillar_or_internal(
            start + month_offset,
            FIRST_MONTH_BRANCH + month_offset,
            "month",
        )
    }

    pub fn day_pillar(date: NaiveDate) -> Result<Pillar> {
        let diff = date.signed_duration_since(anchor_date()?).num_days();
        Ok(cycle::pillar_at(diff))
    }

    /// `hour` is 0-23. 23:00 already belongs to the next 子 block.
    pub fn hour_pillar(day_stem: Stem, hour: u32) -> Result<Pillar> {
        let branch = hour_branch(hour);
        let start = HOUR_STEM_START[day_stem.pair_group()];
        let branch_index = branch.index() as i64;
        pillar_or_internal(start + branch_index, branch_index, "hour")
    }
}

pub fn hour_branch(hour: u32) -> Branch {
    cycle::branch_at((hour as i64 + 1) / 2)
}

pub fn validate_hour(hour: i32) -> Result<u32> {
    if !(0..=23).contains(&hour) {
        return Err(BaziError::InvalidHour { hour });
    }
    Ok(hour as u32)
}

pub fn validate_date(year: i32, month: i32, day: i32) -> Result<NaiveDate> {
    let invalid = || BaziError::InvalidDate { year, month, day };
    let month_u = u32::try_from(month).map_err(|_| invalid())?;
    let day_u = u32::try_from(day).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month_u, day_u).ok_or_else(invalid)
}

pub fn anchor_date() -> Result<NaiveDate> {
    let (y, m, d) = ANCHOR_DATE;
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| BaziError::InternalComputation {
        message: format!("anchor date {}-{}-{} is not constructible", y, m, d),
    })
}

fn pillar_or_internal(stem_index: i64, branch_index: i64, which: &str) -> Result<Pillar> {
    cycle::pillar_from_indices(stem_index, branch_index).ok_or_else(|| {
        BaziError::InternalComputation {
            message: format!(
                "{} pillar indices ({}, {}) fall outside the sexagenary cycle",
                which, stem_index, branch_index
            ),
        }
    })
}

//! Plain-text rendering of a chart, in the labels the presentation layer shows.

use crate::domain::model::{BaziChart, Element};
use crate::utils::error::BaziError;

const PILLAR_LABELS: [&str; 4] = ["年柱", "月柱", "日柱", "时柱"];

/// One line per pillar, e.g. `年柱: 甲子`. The hour line also names its
/// double hour, e.g. `时柱: 甲子 (23:00-00:59)`.
pub fn format_pillars(chart: &BaziChart) -> String {
    let mut lines: Vec<String> = PILLAR_LABELS
        .iter()
        .zip(chart.pillars().as_array())
        .map(|(label, pillar)| format!("{}: {}", label, pillar))
        .collect();
    if let Some(hour) = lines.last_mut() {
        hour.push_str(&format!(" ({})", chart.hour_pillar.branch.double_hour()));
    }
    lines.join("\n")
}

pub fn interpretation(chart: &BaziChart) -> String {
    let mut lines = vec![
        format!("日主: {}", chart.day_master_label()),
        format!("八字强弱: {}", chart.strength),
    ];

    if !chart.favorable_elements.is_empty() {
        lines.push(format!("喜用神: {}", join_elements(&chart.favorable_elements)));
    }
    if !chart.unfavorable_elements.is_empty() {
        lines.push(format!("忌神: {}", join_elements(&chart.unfavorable_elements)));
    }

    lines.join("\n")
}

/// Five-element counts on one line, e.g. `木0 火4 土2 金2 水0`.
pub fn format_tally(chart: &BaziChart) -> String {
    chart
        .five_elements
        .iter()
        .map(|(element, count)| format!("{}{}", element, count))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn failure_message(err: &BaziError) -> String {
    format!("计算出错: {}", err.user_friendly_message())
}

pub fn join_elements(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ")
}

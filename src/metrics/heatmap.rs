//! Activity heatmaps and calendar patterns: 7×24 matrices, monthly volume,
//! weekday/weekend split, volume trend.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::ParsedConversation;
use crate::stats::{linear_slope, round2};
use crate::timeutil::{hour_of, is_weekend, month_key, weekday_of};

/// Messages by (day of week, hour). Row 0 is Monday.
pub type HourMatrix = [[u32; 24]; 7];

/// Heatmap and calendar profile of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapAnalysis {
    pub per_person: IndexMap<String, HourMatrix>,
    pub combined: HourMatrix,
    /// Message count per `YYYY-MM`, per person
    pub monthly_per_person: IndexMap<String, IndexMap<String, usize>>,
    /// Message count per `YYYY-MM`, all participants
    pub monthly_total: IndexMap<String, usize>,
    pub weekday_messages: usize,
    pub weekend_messages: usize,
    /// OLS slope of the monthly totals
    pub volume_trend: f64,
    /// The three busiest clock hours, busiest first; the best time to
    /// text. Ties resolve to the earlier hour.
    pub best_hours: Vec<u32>,
}

pub fn analyze(conv: &ParsedConversation) -> HeatmapAnalysis {
    let mut per_person: IndexMap<String, HourMatrix> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), [[0u32; 24]; 7]))
        .collect();
    let mut combined: HourMatrix = [[0; 24]; 7];

    let mut monthly_per_person: IndexMap<String, IndexMap<String, usize>> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), IndexMap::new()))
        .collect();
    let mut monthly_total: IndexMap<String, usize> = IndexMap::new();

    let mut weekday_messages = 0usize;
    let mut weekend_messages = 0usize;

    for msg in conv.user_messages() {
        let day = weekday_of(msg.timestamp) as usize;
        let hour = hour_of(msg.timestamp) as usize;
        combined[day][hour] += 1;
        if let Some(matrix) = per_person.get_mut(&msg.sender) {
            matrix[day][hour] += 1;
        }

        let month = month_key(msg.timestamp);
        *monthly_total.entry(month.clone()).or_default() += 1;
        if let Some(person_months) = monthly_per_person.get_mut(&msg.sender) {
            *person_months.entry(month).or_default() += 1;
        }

        if is_weekend(msg.timestamp) {
            weekend_messages += 1;
        } else {
            weekday_messages += 1;
        }
    }

    monthly_total.sort_keys();
    for person_months in monthly_per_person.values_mut() {
        person_months.sort_keys();
    }

    let series: Vec<f64> = monthly_total.values().map(|&v| v as f64).collect();
    let volume_trend = round2(linear_slope(&series));

    let mut hourly: Vec<(u32, u32)> = (0..24)
        .map(|hour| {
            let count = combined.iter().map(|day| day[hour as usize]).sum();
            (hour, count)
        })
        .collect();
    hourly.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let best_hours = hourly
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .take(3)
        .map(|(hour, _)| hour)
        .collect();

    HeatmapAnalysis {
        per_person,
        combined,
        monthly_per_person,
        monthly_total,
        weekday_messages,
        weekend_messages,
        volume_trend,
        best_hours,
    }
}

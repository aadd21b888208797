//! Pure reductions from a page of events to dashboard metrics.
//!
//! Everything here is computed over the events handed in, which is
//! whatever page the reader fetched. Once event volume exceeds the page
//! size the figures describe the most recent page only;
//! [`MetricsSummary::truncated`] flags that case.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Action, ActivityEvent, Device};

/// Bars shown in the "views by store/service" chart.
pub const TOP_SUBJECTS: usize = 5;

/// Rows shown in the "top locations" table.
pub const TOP_LOCATIONS: usize = 10;

/// One labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CountEntry {
    /// Group key (subject name, location, or action).
    pub label: String,
    /// Number of events in the group.
    pub count: u64,
}

/// Mobile versus desktop event counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeviceSplit {
    /// Events from phones and tablets.
    pub mobile: u64,
    /// Everything else.
    pub desktop: u64,
}

/// All dashboard metrics for one page of events.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetricsSummary {
    /// Number of events the metrics were computed from.
    pub sample_size: usize,
    /// `true` when the sample hit the read cap, so older events were left out.
    pub truncated: bool,
    /// `View` events.
    pub views: u64,
    /// `Favorite` events.
    pub favorites: u64,
    /// `Review` events.
    pub reviews: u64,
    /// Favorites as a percentage of views, e.g. `"50.0%"`.
    pub conversion_rate: String,
    /// Mean of rating values, when any were present.
    pub average_rating: Option<f64>,
    /// Top subjects by event count.
    pub by_subject: Vec<CountEntry>,
    /// Top locations by event count.
    pub by_location: Vec<CountEntry>,
    /// Counts for every action seen.
    pub by_action: Vec<CountEntry>,
    /// Device breakdown.
    pub devices: DeviceSplit,
}

/// Counts occurrences of each key, sorted by count descending with ties
/// left in first-seen order, then truncated to `limit` when given.
fn ranked_counts<'a, I>(keys: I, limit: Option<usize>) -> Vec<CountEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut entries: Vec<CountEntry> = Vec::new();

    for key in keys {
        match positions.get(key) {
            Some(&pos) => {
                if let Some(entry) = entries.get_mut(pos) {
                    entry.count += 1;
                }
            }
            None => {
                positions.insert(key, entries.len());
                entries.push(CountEntry {
                    label: key.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, which is what keeps ties in first-seen order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

/// Event counts per subject name, top `limit`.
#[must_use]
pub fn count_by_subject(events: &[ActivityEvent], limit: usize) -> Vec<CountEntry> {
    ranked_counts(events.iter().map(|e| e.subject_name.as_str()), Some(limit))
}

/// Event counts per location, top `limit`.
#[must_use]
pub fn count_by_location(events: &[ActivityEvent], limit: usize) -> Vec<CountEntry> {
    ranked_counts(events.iter().map(|e| e.location.as_str()), Some(limit))
}

/// Event counts per action tag.
#[must_use]
pub fn count_by_action(events: &[ActivityEvent]) -> Vec<CountEntry> {
    ranked_counts(events.iter().map(|e| e.action.as_str()), None)
}

/// Splits events by device class.
#[must_use]
pub fn device_split(events: &[ActivityEvent]) -> DeviceSplit {
    events
        .iter()
        .fold(DeviceSplit::default(), |mut split, event| {
            match event.device {
                Device::Mobile => split.mobile += 1,
                Device::Desktop => split.desktop += 1,
            }
            split
        })
}

/// Favorites over views as a one-decimal percentage string.
///
/// Returns exactly `"0.0%"` when `views` is zero.
#[must_use]
pub fn conversion_rate(favorites: u64, views: u64) -> String {
    if views == 0 {
        return "0.0%".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let pct = favorites as f64 / views as f64 * 100.0;
    format!("{pct:.1}%")
}

fn count_where(events: &[ActivityEvent], pred: impl Fn(&ActivityEvent) -> bool) -> u64 {
    events.iter().filter(|e| pred(e)).count() as u64
}

fn average_rating(events: &[ActivityEvent]) -> Option<f64> {
    let (sum, n) = events
        .iter()
        .filter_map(ActivityEvent::rating)
        .fold((0.0, 0_u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / f64::from(n))
}

/// Computes every metric for a page of events.
///
/// `page_size` is the cap the page was fetched with; it only feeds the
/// `truncated` flag.
#[must_use]
pub fn summarize(events: &[ActivityEvent], page_size: usize) -> MetricsSummary {
    let views = count_where(events, ActivityEvent::is_view);
    let favorites = count_where(events, ActivityEvent::is_favorite);
    MetricsSummary {
        sample_size: events.len(),
        truncated: page_size > 0 && events.len() >= page_size,
        views,
        favorites,
        reviews: count_where(events, |e| e.action == Action::Review),
        conversion_rate: conversion_rate(favorites, views),
        average_rating: average_rating(events),
        by_subject: count_by_subject(events, TOP_SUBJECTS),
        by_location: count_by_location(events, TOP_LOCATIONS),
        by_action: count_by_action(events),
        devices: device_split(events),
    }
}

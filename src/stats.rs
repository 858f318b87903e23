use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::Serialize;
use tracing::warn;

use crate::model::Rating;

/// Number of weekday buckets, Sunday first.
pub const WEEKDAYS: usize = 7;

/// Largest rating scale a histogram is built for.
pub const MAX_SCALE: f64 = 1000.0;

/// How the busiest-week tally treats the last week of a series.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WeekTally {
    /// Weeks are only compared when the next week starts, so the final week
    /// never counts towards `max_per_week`.
    #[default]
    OnChange,
    /// Also compare the final open week once the series ends.
    FlushFinal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonStats {
    pub has_date: bool,
    pub max_per_week: u32,
    #[serde(skip)]
    pub longest: TimeDelta,
    pub longest_after: Option<String>,

    pub weekdays: Vec<u32>,
    pub weekday_ratios: Vec<f64>,
    pub ratings: Vec<u32>,
    pub rating_ratios: Vec<f64>,

    pub formatted_longest: String,
}

impl PersonStats {
    pub fn pct(part: u32, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }
}

/// Single-pass fold over one person's series.
///
/// Feed ratings in file order with [`StatsAccumulator::record`], then call
/// [`StatsAccumulator::finish`].
#[derive(Debug)]
pub struct StatsAccumulator {
    tally: WeekTally,
    count: usize,
    has_date: bool,

    ratings: Option<Vec<u32>>,
    weekdays: [u32; WEEKDAYS],

    /// ISO week number only; the year is not part of the comparison.
    week: Option<u32>,
    week_count: u32,
    max_per_week: u32,

    prev: Option<NaiveDate>,
    longest: TimeDelta,
    longest_after: Option<String>,
}

impl StatsAccumulator {
    pub fn new(tally: WeekTally) -> Self {
        StatsAccumulator {
            tally,
            count: 0,
            has_date: false,
            ratings: None,
            weekdays: [0; WEEKDAYS],
            week: None,
            week_count: 1,
            max_per_week: 0,
            prev: None,
            longest: TimeDelta::zero(),
            longest_after: None,
        }
    }

    /// Folds one rating. `item_name` is the catalog name the rating resolved
    /// to, if any.
    pub fn record(&mut self, rating: &Rating, item_name: Option<&str>) {
        self.count += 1;

        // The first rating fixes the histogram width for the whole series
        let ratings = self
            .ratings
            .get_or_insert_with(|| vec![0; histogram_width(rating.max)]);

        match bucket_index(rating.value).and_then(|i| ratings.get_mut(i)) {
            Some(bucket) => *bucket += 1,
            None => warn!(
                number = rating.number,
                value = rating.value,
                buckets = ratings.len(),
                "Rating value outside histogram, dropped"
            ),
        }

        let Some(date) = rating.date else {
            return;
        };

        self.has_date = true;
        self.weekdays[date.weekday().num_days_from_sunday() as usize] += 1;

        let week = date.iso_week().week();
        if self.week == Some(week) {
            self.week_count += 1;
        } else {
            self.max_per_week = self.max_per_week.max(self.week_count);
            self.week = Some(week);
            self.week_count = 1;
        }

        let prev = *self.prev.get_or_insert(date);
        let gap = date - prev;
        if gap > self.longest {
            self.longest = gap;
            self.longest_after = item_name.map(str::to_string);
        }
        self.prev = Some(date);
    }

    pub fn finish(self) -> PersonStats {
        let mut max_per_week = self.max_per_week;
        if self.tally == WeekTally::FlushFinal && self.week.is_some() {
            max_per_week = max_per_week.max(self.week_count);
        }

        let ratings = self.ratings.unwrap_or_default();
        let weekday_ratios = self
            .weekdays
            .iter()
            .map(|&n| PersonStats::pct(n, self.count))
            .collect();
        let rating_ratios = ratings
            .iter()
            .map(|&n| PersonStats::pct(n, self.count))
            .collect();

        let formatted_longest = format!("{:.0} days", self.longest.num_hours() as f64 / 24.0);

        PersonStats {
            has_date: self.has_date,
            max_per_week,
            longest: self.longest,
            longest_after: self.longest_after,
            weekdays: self.weekdays.to_vec(),
            weekday_ratios,
            ratings,
            rating_ratios,
            formatted_longest,
        }
    }
}

/// `trunc(max) + 1` buckets; none for a negative or non-finite max, and never
/// more than `MAX_SCALE + 1`.
fn histogram_width(max: f64) -> usize {
    let width = (max + 1.0).trunc();
    if width.is_finite() && width > 0.0 {
        width.min(MAX_SCALE + 1.0) as usize
    } else {
        0
    }
}

fn bucket_index(value: f64) -> Option<usize> {
    let idx = value.trunc();
    if idx.is_finite() && idx >= 0.0 {
        Some(idx as usize)
    } else {
        None
    }
}

//! Per-person aggregation: attaches a rating series to the catalog and folds
//! it into [`PersonStats`].

use tracing::debug;

use crate::model::{Catalog, Rating};
use crate::stats::{PersonStats, StatsAccumulator, WeekTally};

#[derive(Debug, Default, Clone, Copy)]
pub struct AggregateOptions {
    pub week_tally: WeekTally,
}

/// Attaches every rating in `ratings` to `catalog` under `person` and
/// computes that person's statistics in a single pass.
///
/// `ratings` must be in visit order; later ratings of the same item replace
/// earlier ones.
#[tracing::instrument(skip(ratings, catalog), fields(count = ratings.len()))]
pub fn aggregate_series(
    person: &str,
    ratings: &[Rating],
    catalog: &mut Catalog,
    options: AggregateOptions,
) -> PersonStats {
    let mut acc = StatsAccumulator::new(options.week_tally);

    for rating in ratings {
        let name = catalog.attach(person, rating);
        acc.record(rating, name);
    }

    let stats = acc.finish();
    debug!(
        has_date = stats.has_date,
        max_per_week = stats.max_per_week,
        longest = %stats.formatted_longest,
        "Series aggregated"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use chrono::{NaiveDate, TimeDelta};

    #[test]
    fn test_aggregate_attaches_and_folds() {
        let mut catalog = sample_catalog();
        let ratings = vec![
            dated(1, "20150101", 6.0),
            dated(2, "20150101", 8.0),
            dated(3, "20150110", 9.0),
        ];

        let stats = aggregate_series("Alice", &ratings, &mut catalog, AggregateOptions::default());

        assert_eq!(stats.longest, TimeDelta::days(9));
        assert_eq!(stats.longest_after.as_deref(), Some("Fried Rice"));
        for item in catalog.items() {
            assert!(item.ratings.contains_key("Alice"));
        }
    }

    #[test]
    fn test_aggregate_unmatched_rating_still_counts() {
        let mut catalog = sample_catalog();
        let ratings = vec![dated(1, "20150101", 6.0), dated(42, "20150105", 8.0)];

        let stats = aggregate_series("Bob", &ratings, &mut catalog, AggregateOptions::default());

        assert_eq!(stats.ratings[8], 1);
        assert_eq!(stats.longest, TimeDelta::days(4));
        assert_eq!(stats.longest_after, None);
        assert_eq!(
            catalog.items().iter().filter(|i| !i.ratings.is_empty()).count(),
            1
        );
    }

    #[test]
    fn test_aggregate_people_do_not_clobber_each_other() {
        let mut catalog = sample_catalog();
        let options = AggregateOptions::default();

        aggregate_series("Alice", &[dated(1, "20150101", 6.0)], &mut catalog, options);
        aggregate_series("Bob", &[dated(1, "20150102", 3.0)], &mut catalog, options);

        let item = &catalog.items()[0];
        assert_eq!(item.ratings["Alice"].value, 6.0);
        assert_eq!(item.ratings["Bob"].value, 3.0);
    }

    #[test]
    fn test_aggregate_week_tally_option() {
        let ratings = vec![
            dated(1, "20150105", 6.0),
            dated(2, "20150106", 8.0),
            dated(3, "20150107", 9.0),
        ];

        let default = aggregate_series(
            "Alice",
            &ratings,
            &mut sample_catalog(),
            AggregateOptions::default(),
        );
        let flushed = aggregate_series(
            "Alice",
            &ratings,
            &mut sample_catalog(),
            AggregateOptions {
                week_tally: WeekTally::FlushFinal,
            },
        );

        assert_eq!(default.max_per_week, 1);
        assert_eq!(flushed.max_per_week, 3);
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Item::new(1, "Wonton Soup"),
            Item::new(2, "Spring Rolls"),
            Item::new(3, "Fried Rice"),
        ])
    }

    fn dated(number: i64, date: &str, value: f64) -> Rating {
        let date = NaiveDate::parse_from_str(date, "%Y%m%d").unwrap();
        Rating::new(number, Some(date), value, 10.0)
    }
}

//! Report driver: load the catalog once, then load and aggregate every
//! person's series in listing order.

use std::collections::BTreeMap;

use tracing::info;

use crate::aggregate::{AggregateOptions, aggregate_series};
use crate::config::ReportConfig;
use crate::discovery::discover_series;
use crate::error::ReportError;
use crate::model::Item;
use crate::parser::{load_catalog, load_ratings};
use crate::stats::PersonStats;

/// Everything the renderer needs.
#[derive(Debug, Clone)]
pub struct Report {
    pub items: Vec<Item>,
    pub stats: BTreeMap<String, PersonStats>,
}

/// Builds a report from the files named in `config`.
///
/// # Errors
///
/// Returns the first I/O or parse failure; nothing is partially built.
#[tracing::instrument(skip(config), fields(menu = %config.menu_path.display(), ratings = %config.ratings_dir.display()))]
pub fn build_report(config: &ReportConfig, options: AggregateOptions) -> Result<Report, ReportError> {
    let mut catalog = load_catalog(&config.menu_path)?;
    info!(items = catalog.len(), "Catalog loaded");

    let series = discover_series(&config.ratings_dir)?;
    info!(people = series.len(), "Rating series discovered");

    let mut stats = BTreeMap::new();

    for file in series {
        let ratings = load_ratings(&file.path)?;
        info!(person = %file.person, ratings = ratings.len(), "Aggregating series");

        let person_stats = aggregate_series(&file.person, &ratings, &mut catalog, options);
        stats.insert(file.person, person_stats);
    }

    Ok(Report {
        items: catalog.into_items(),
        stats,
    })
}

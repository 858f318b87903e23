//! Catalog items and the ratings attached to them.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// A single rating row from one person's series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub number: i64,
    pub date: Option<NaiveDate>,
    pub value: f64,
    pub max: f64,

    /// Display form of `date`, e.g. `Thu Jan 1 2015`. Empty when undated.
    pub formatted_date: String,
}

impl Rating {
    pub fn new(number: i64, date: Option<NaiveDate>, value: f64, max: f64) -> Self {
        let formatted_date = date
            .map(|d| d.format("%a %b %-d %Y").to_string())
            .unwrap_or_default();

        Rating {
            number,
            date,
            value,
            max,
            formatted_date,
        }
    }
}

/// A menu item and every person's latest rating of it.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub number: i64,
    pub name: String,
    pub ratings: BTreeMap<String, Rating>,
}

impl Item {
    pub fn new(number: i64, name: impl Into<String>) -> Self {
        Item {
            number,
            name: name.into(),
            ratings: BTreeMap::new(),
        }
    }
}

/// The ordered item list plus a number → position index.
///
/// When the same number appears more than once, the first item wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<i64, usize>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            index.entry(item.number).or_insert(pos);
        }
        Catalog { items, index }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records `rating` under `person` on the matching item, replacing any
    /// earlier rating by the same person. Returns the item's name, or `None`
    /// when the number is not in the catalog.
    pub fn attach(&mut self, person: &str, rating: &Rating) -> Option<&str> {
        let Some(&pos) = self.index.get(&rating.number) else {
            debug!(person, number = rating.number, "Rating has no matching item");
            return None;
        };

        let item = &mut self.items[pos];
        item.ratings.insert(person.to_string(), rating.clone());
        Some(item.name.as_str())
    }
}

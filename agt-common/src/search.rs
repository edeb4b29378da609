//! Ranked equipment search
//!
//! Matching is a case-insensitive substring test on model name or brand
//! name. Matches are ranked by prefix score:
//! - model name starts with the query: +100
//! - brand name starts with the query: +50
//!
//! Ties break on model name, ascending ordinal order. Suggestions (the
//! quick-search dropdown) are the first [`MAX_SUGGESTIONS`] ranked items.

use serde::{Deserialize, Serialize};

use crate::db::models::Equipment;

/// Upper bound on suggestions returned to the quick-search box
pub const MAX_SUGGESTIONS: usize = 8;

pub const MODEL_PREFIX_SCORE: u32 = 100;
pub const BRAND_PREFIX_SCORE: u32 = 50;

/// Display-friendly projection of a matched item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    pub id: i64,
    pub title: String,
    /// `"<brand> · <type>"`
    pub subtitle: String,
    /// Details page for the item
    pub url: String,
}

impl SearchSuggestion {
    pub fn from_equipment(item: &Equipment) -> Self {
        Self {
            id: item.id,
            title: item.model_name.clone(),
            subtitle: format!("{} · {}", item.brand_name().unwrap_or_default(), item.kind),
            url: details_url(item.id),
        }
    }
}

pub fn details_url(id: i64) -> String {
    format!("/Equipments/Details/{}", id)
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// True if the model or brand name contains the query (case-insensitive)
///
/// A blank query matches everything.
pub fn matches(item: &Equipment, query: &str) -> bool {
    let query = normalize(query);
    query.is_empty() || contains_normalized(item, &query)
}

fn contains_normalized(item: &Equipment, query: &str) -> bool {
    item.model_name.to_lowercase().contains(query)
        || item
            .brand_name()
            .is_some_and(|brand| brand.to_lowercase().contains(query))
}

/// Prefix score of one item (0, 50, 100 or 150)
pub fn score(item: &Equipment, query: &str) -> u32 {
    score_normalized(item, &normalize(query))
}

fn score_normalized(item: &Equipment, query: &str) -> u32 {
    let mut score = 0;
    if item.model_name.trim().to_lowercase().starts_with(query) {
        score += MODEL_PREFIX_SCORE;
    }
    if item
        .brand_name()
        .is_some_and(|brand| brand.trim().to_lowercase().starts_with(query))
    {
        score += BRAND_PREFIX_SCORE;
    }
    score
}

/// Filter and order items by relevance, without truncation
///
/// A blank query returns every item in its original order, unscored.
pub fn rank<'a>(items: &'a [Equipment], query: &str) -> Vec<&'a Equipment> {
    let query = normalize(query);
    if query.is_empty() {
        return items.iter().collect();
    }

    let mut scored: Vec<(u32, &Equipment)> = items
        .iter()
        .filter(|item| contains_normalized(item, &query))
        .map(|item| (score_normalized(item, &query), item))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| a.model_name.cmp(&b.model_name))
    });

    scored.into_iter().map(|(_, item)| item).collect()
}

/// Top ranked items projected for the quick-search box
pub fn suggest(items: &[Equipment], query: &str) -> Vec<SearchSuggestion> {
    rank(items, query)
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(SearchSuggestion::from_equipment)
        .collect()
}

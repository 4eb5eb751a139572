//! Keyword tool search over a registry.

use async_trait::async_trait;
use std::sync::Arc;
use tooltrial_application::{ToolSearchError, ToolSearchPort};
use tooltrial_domain::core::string::words;
use tooltrial_domain::{ToolCapability, ToolRegistry, ToolSearchHit};

/// Field weights: a query word hitting the name counts most.
const NAME_WEIGHT: f64 = 1.0;
const CATEGORY_WEIGHT: f64 = 0.6;
const PARAMETER_WEIGHT: f64 = 0.5;
const DESCRIPTION_WEIGHT: f64 = 0.4;

/// Shortest word allowed to match by prefix (`fetch` ~ `fetcher`).
const MIN_PREFIX_LEN: usize = 4;

/// Word-overlap search over tool names, categories, parameter names and
/// descriptions.
///
/// Each query word scores the weight of the best field it matches; the
/// tool's score is the mean over query words, so it lies in `[0, 1]`.
/// Tools scoring zero are never returned. Ties keep registry order.
pub struct KeywordToolSearch {
    registry: Arc<ToolRegistry>,
}

impl KeywordToolSearch {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn rank(&self, query: &str, k: usize) -> Vec<ToolSearchHit> {
        let query_words = words(query);
        if query_words.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &ToolCapability)> = self
            .registry
            .all()
            .map(|tool| (score(tool, &query_words), tool))
            .filter(|(s, _)| *s > 0.0)
            .collect();
        // Stable sort keeps registry order among ties
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored
            .into_iter()
            .take(k)
            .map(|(s, tool)| ToolSearchHit::new(tool.clone(), s))
            .collect()
    }
}

#[async_trait]
impl ToolSearchPort for KeywordToolSearch {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ToolSearchHit>, ToolSearchError> {
        Ok(self.rank(query, k))
    }
}

fn word_matches(query: &str, field: &str) -> bool {
    query == field
        || (query.len() >= MIN_PREFIX_LEN && field.starts_with(query))
        || (field.len() >= MIN_PREFIX_LEN && query.starts_with(field))
}

fn score(tool: &ToolCapability, query_words: &[String]) -> f64 {
    let name = words(&tool.name);
    let mut category = words(&tool.category);
    category.extend(words(tool.kind().as_str()));
    let parameters: Vec<String> = tool.parameters.iter().flat_map(|p| words(&p.name)).collect();
    let description = words(&tool.description);

    let fields: [(&[String], f64); 4] = [
        (&name, NAME_WEIGHT),
        (&category, CATEGORY_WEIGHT),
        (&parameters, PARAMETER_WEIGHT),
        (&description, DESCRIPTION_WEIGHT),
    ];

    let total: f64 = query_words
        .iter()
        .map(|q| {
            fields
                .iter()
                .filter(|(field, _)| field.iter().any(|w| word_matches(q, w)))
                .map(|(_, weight)| *weight)
                .fold(0.0, f64::max)
        })
        .sum();
    total / query_words.len() as f64
}

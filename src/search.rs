use crate::model::Restaurant;

pub const DEFAULT_SUGGESTIONS: [&str; 5] = ["pizza", "burger", "mexican", "japanese", "cafe"];

/// What the user asked for. Empty input means "show everything".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    All,
    Term(String),
}

impl SearchQuery {
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            SearchQuery::All
        } else {
            SearchQuery::Term(trimmed.to_string())
        }
    }

    /// Noun used in the results header.
    pub fn label(&self) -> &'static str {
        match self {
            SearchQuery::All => "restaurants",
            SearchQuery::Term(_) => "results",
        }
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        match self {
            SearchQuery::All => true,
            SearchQuery::Term(term) => {
                let needle = term.to_lowercase();
                restaurant
                    .searchable_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Order-preserving subsequence of `data` matching `query`.
pub fn filter(data: &[Restaurant], query: &SearchQuery) -> Vec<Restaurant> {
    data.iter().filter(|r| query.matches(r)).cloned().collect()
}

pub fn no_match_message(term: &str, suggestions: &[String]) -> String {
    format!(
        "No restaurants found matching \"{term}\". Try searching for: {}",
        suggestions.join(", ")
    )
}

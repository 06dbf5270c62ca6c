//! Declarative description of the results panel. Front ends turn a
//! [`PanelView`] into widgets or text and bind [`CardAction`]s themselves.

use crate::model::Restaurant;
use crate::search::SearchQuery;

#[derive(Debug, Clone, PartialEq)]
pub enum CardAction {
    Locate { lat: f64, lon: f64, name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub name: String,
    pub kind: String,
    pub cuisine: String,
    pub address: String,
    pub action: CardAction,
}

impl CardView {
    pub fn detail_lines(&self) -> [String; 3] {
        [
            format!("Type: {}", self.kind),
            format!("Cuisine: {}", self.cuisine),
            format!("Address: {}", self.address),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub header: String,
    pub cards: Vec<CardView>,
}

pub fn build_panel(results: &[Restaurant], query: &SearchQuery) -> PanelView {
    let cards = results
        .iter()
        .map(|r| CardView {
            name: r.name.clone(),
            kind: r.kind.clone(),
            cuisine: r.cuisine.clone(),
            address: r.address.clone(),
            action: CardAction::Locate {
                lat: r.lat,
                lon: r.lon,
                name: r.name.clone(),
            },
        })
        .collect();
    PanelView {
        header: format!("Found {} {}", results.len(), query.label()),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tonys() -> Restaurant {
        Restaurant {
            name: "Tony's Pizza".into(),
            kind: "Restaurant".into(),
            cuisine: "Italian".into(),
            address: "1 Main St".into(),
            lat: 40.0,
            lon: -73.0,
        }
    }

    #[test]
    fn test_build_panel_for_term() {
        let panel = build_panel(&[tonys()], &SearchQuery::Term("pizza".into()));
        assert_eq!(panel.header, "Found 1 results");
        assert_eq!(panel.cards.len(), 1);
        let card = &panel.cards[0];
        assert_eq!(card.name, "Tony's Pizza");
        assert_eq!(
            card.detail_lines(),
            [
                "Type: Restaurant".to_string(),
                "Cuisine: Italian".to_string(),
                "Address: 1 Main St".to_string()
            ]
        );
        assert_eq!(
            card.action,
            CardAction::Locate {
                lat: 40.0,
                lon: -73.0,
                name: "Tony's Pizza".into()
            }
        );
    }

    #[test]
    fn test_build_panel_for_all() {
        let panel = build_panel(&[tonys(), tonys()], &SearchQuery::All);
        assert_eq!(panel.header, "Found 2 restaurants");
    }

    #[test]
    fn test_same_inputs_same_panel() {
        let q = SearchQuery::Term("pizza".into());
        assert_eq!(build_panel(&[tonys()], &q), build_panel(&[tonys()], &q));
    }
}

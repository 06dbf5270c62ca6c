use serde::{Deserialize, Serialize};

/// One entry of the restaurant dataset. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub cuisine: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

/// Top-level shape of `restaurants.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantFile {
    pub restaurants: Vec<Restaurant>,
}

impl Restaurant {
    /// Fields a search term is matched against, in match order.
    pub fn searchable_fields(&self) -> [&str; 3] {
        [&self.name, &self.cuisine, &self.kind]
    }
}

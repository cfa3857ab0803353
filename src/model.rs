//! Store and category records plus the GraphQL shapes built from them

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// Physical store location as held by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude", alias = "lon")]
    pub lng: f64,
    pub category_id: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Store {
    /// Single-line address: `address, city, country`
    pub fn formatted_address(&self) -> String {
        format!("{}, {}, {}", self.address, self.city, self.country)
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus::from(self.is_active)
    }
}

/// Store grouping with its own active flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Display status derived from a store's active flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Enabled,
    Disabled,
}

impl StoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
    }
}

impl From<bool> for StoreStatus {
    fn from(active: bool) -> Self {
        if active {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{storeName, address}`
#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct StoreLocation {
    pub store_name: String,
    pub address: String,
}

impl From<&Store> for StoreLocation {
    fn from(store: &Store) -> Self {
        Self {
            store_name: store.name.clone(),
            address: store.formatted_address(),
        }
    }
}

/// `{storeName, address, status}`
#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct StoreWithStatus {
    pub store_name: String,
    pub address: String,
    pub status: String,
}

impl From<&Store> for StoreWithStatus {
    fn from(store: &Store) -> Self {
        Self {
            store_name: store.name.clone(),
            address: store.formatted_address(),
            status: store.status().to_string(),
        }
    }
}

/// `{storeName, address, distance}`, distance in kilometres
#[derive(SimpleObject, Debug, Clone, PartialEq)]
pub struct StoreWithDistance {
    pub store_name: String,
    pub address: String,
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(active: bool) -> Store {
        Store {
            id: 7,
            name: "Harbor Outlet".to_string(),
            address: "12 Pier Road".to_string(),
            city: "Portsmouth".to_string(),
            country: "GB".to_string(),
            lat: 50.8,
            lng: -1.09,
            category_id: 3,
            is_active: active,
        }
    }

    #[test]
    fn test_formatted_address() {
        assert_eq!(store(true).formatted_address(), "12 Pier Road, Portsmouth, GB");
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(StoreWithStatus::from(&store(true)).status, "Enabled");
        assert_eq!(StoreWithStatus::from(&store(false)).status, "Disabled");
    }

    #[test]
    fn test_store_deserializes_with_aliases_and_defaults() {
        let json = r#"{
            "id": 1, "name": "A", "address": "1 Main St", "city": "X", "country": "US",
            "latitude": 40.0, "longitude": -75.0, "category_id": 2
        }"#;
        let store: Store = serde_json::from_str(json).unwrap();
        assert_eq!(store.lat, 40.0);
        assert_eq!(store.lng, -75.0);
        assert!(store.is_active);
    }
}

//! Advertisement entity and request schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::AppError;

/// One row of the `advertisements` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Advertisement {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Create body. `id` and `created_at` are server-assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAdvertisement {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub author: String,
}

/// Distinguishes an absent field (outer `None`) from an explicit `null`
/// (`Some(None)`) so PATCH can clear nullable columns.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Patch body: only supplied fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAdvertisement {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub author: Option<String>,
}

impl UpdateAdvertisement {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.author.is_none()
    }
}

/// Search predicates. All optional; substring filters are case-insensitive,
/// price bounds inclusive. Supplied predicates are OR-combined.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchFilters {
    /// Parse raw query params. Empty-string text params count as absent;
    /// unknown params are ignored; an unparsable price is a validation error.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let text = |key: &str| {
            params
                .get(key)
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        };
        let price = |key: &str| -> Result<Option<f64>, AppError> {
            match params.get(key) {
                None => Ok(None),
                Some(v) => v
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| AppError::Validation(format!("{} must be a number", key))),
            }
        };
        Ok(SearchFilters {
            title: text("title"),
            description: text("description"),
            author: text("author"),
            min_price: price("min_price")?,
            max_price: price("max_price")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_requires_title_price_author() {
        let err = serde_json::from_value::<NewAdvertisement>(serde_json::json!({
            "description": "no title", "price": 1.0, "author": "bob"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("title"));

        let err = serde_json::from_value::<NewAdvertisement>(serde_json::json!({
            "title": "t", "author": "bob"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn create_body_description_defaults_to_none() {
        let new: NewAdvertisement = serde_json::from_value(serde_json::json!({
            "title": "bike", "price": 120.5, "author": "alice"
        }))
        .unwrap();
        assert_eq!(new.description, None);
    }

    #[test]
    fn create_body_ignores_unknown_fields() {
        let new: NewAdvertisement = serde_json::from_value(serde_json::json!({
            "title": "bike", "price": 120.5, "author": "alice", "color": "red"
        }))
        .unwrap();
        assert_eq!(new.title, "bike");
    }

    #[test]
    fn patch_body_distinguishes_absent_from_null() {
        let patch: UpdateAdvertisement = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.description, None);

        let patch: UpdateAdvertisement =
            serde_json::from_value(serde_json::json!({ "description": null })).unwrap();
        assert_eq!(patch.description, Some(None));
        assert!(!patch.is_empty());

        let patch: UpdateAdvertisement =
            serde_json::from_value(serde_json::json!({ "description": "fresh" })).unwrap();
        assert_eq!(patch.description, Some(Some("fresh".into())));
    }

    #[test]
    fn patch_body_partial_fields_only() {
        let patch: UpdateAdvertisement =
            serde_json::from_value(serde_json::json!({ "price": 9.99 })).unwrap();
        assert_eq!(patch.price, Some(9.99));
        assert_eq!(patch.title, None);
        assert_eq!(patch.author, None);
        assert_eq!(patch.description, None);
    }

    #[test]
    fn filters_drop_empty_strings() {
        let params: HashMap<String, String> =
            [("title".to_string(), String::new()), ("author".to_string(), "bob".to_string())]
                .into_iter()
                .collect();
        let filters = SearchFilters::from_query(&params).unwrap();
        assert_eq!(filters.title, None);
        assert_eq!(filters.author.as_deref(), Some("bob"));
    }

    #[test]
    fn filters_reject_non_numeric_price() {
        let params: HashMap<String, String> =
            [("min_price".to_string(), "cheap".to_string())].into_iter().collect();
        let err = SearchFilters::from_query(&params).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn filters_accept_zero_price_bound() {
        let params: HashMap<String, String> =
            [("min_price".to_string(), "0".to_string())].into_iter().collect();
        let filters = SearchFilters::from_query(&params).unwrap();
        assert_eq!(filters.min_price, Some(0.0));
        assert!(!filters.is_empty());
    }

    #[test]
    fn filters_ignore_unknown_params() {
        let params: HashMap<String, String> =
            [("page".to_string(), "2".to_string())].into_iter().collect();
        let filters = SearchFilters::from_query(&params).unwrap();
        assert!(filters.is_empty());
    }
}

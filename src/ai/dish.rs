// src/ai/dish.rs
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dish as the recognition service reports it: either just a name, or a
/// name with whatever enrichment was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dish {
    Plain(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tags: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
}

/// Dishes in the order the service returned them.
pub type DishList = Vec<Dish>;

impl Dish {
    pub fn plain(name: impl Into<String>) -> Self {
        Dish::Plain(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Dish::Plain(name) => name,
            Dish::Detailed { name, .. } => name,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Dish::Detailed { tags: Some(tags), .. } => tags,
            _ => &[],
        }
    }
}

/// Pull the dish list out of an `/extract-dishes` body.
///
/// `enriched_dishes` wins over `dishes`. A body with neither (or with
/// something other than an array under them) yields an empty list. Elements
/// that are neither a string nor an object with a string `name` are dropped.
pub fn normalize_response(body: &Value) -> DishList {
    let raw = match (body.get("enriched_dishes"), body.get("dishes")) {
        (Some(Value::Array(enriched)), _) => enriched,
        (_, Some(Value::Array(dishes))) => dishes,
        _ => {
            warn!("Response has neither `enriched_dishes` nor `dishes`; treating as no dishes");
            return DishList::new();
        }
    };

    raw.iter()
        .enumerate()
        .filter_map(|(idx, item)| match Dish::deserialize(item) {
            Ok(dish) => Some(dish),
            Err(e) => {
                warn!("Skipping malformed dish #{}: {}", idx, e);
                None
            }
        })
        .collect()
}

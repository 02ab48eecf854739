use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct Entity {
    pub id: u64,
    #[schema(read_only, format = "date-time")]
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[schema(description = "A product offered in the shop")]
pub struct Product {
    #[serde(flatten)]
    pub entity: Entity,
    #[schema(required, min_length = 1, max_length = 120)]
    pub display_name: String,
    #[schema(type = "string", description = "Decimal price as text")]
    pub price: f64,
    pub tags: Vec<String>,
    pub attributes: HashMap<String, i32>,
    pub category: Option<Box<Category>>,
    pub status: ProductStatus,
    #[schema(hidden)]
    pub internal_cost: f64,
    #[serde(skip)]
    pub cache_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub parent: Option<Box<Category>>,
    pub children: Vec<Category>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Draft,
    OnSale,
    #[serde(rename = "retired")]
    Discontinued,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub first: Option<T>,
    pub total: usize,
    pub links: HashMap<String, Link>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub page: Page<T>,
    #[schema(ref = "Problem")]
    pub error: Option<Problem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Problem {
    pub title: String,
    pub status: u16,
}

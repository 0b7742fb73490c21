use serde::{Deserialize, Serialize};

/// A catalog entry. The `id` is assigned exclusively by the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
}

/// A course without identity. Generated candidates and form submissions are
/// drafts; only the store turns a draft into a `Course`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
}

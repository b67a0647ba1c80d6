//! Catalog models and search filter parsing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of products returned by a search
pub const DEFAULT_SEARCH_LIMIT: i64 = 100;

/// Upper bound on the number of products returned by a search
pub const MAX_SEARCH_LIMIT: i64 = 200;

/// Product categories offered by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Snacks,
    Juice,
    Seafood,
    Meat,
    Grains,
    Fruits,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Snacks,
        Category::Juice,
        Category::Seafood,
        Category::Meat,
        Category::Grains,
        Category::Fruits,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Snacks => "Snacks",
            Category::Juice => "Juice",
            Category::Seafood => "Seafood",
            Category::Meat => "Meat",
            Category::Grains => "Grains",
            Category::Fruits => "Fruits",
        }
    }

    /// Case-insensitive lookup of a category name
    pub fn from_alias(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(raw))
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub category_id: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product as returned to a caller, with membership flags for logged-in callers
///
/// Clients key products on `_id`, so the id is sent under both names.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(rename = "_id")]
    pub key: Uuid,
    #[serde(flatten)]
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart: Option<bool>,
    #[serde(rename = "inCart", skip_serializing_if = "Option::is_none")]
    pub in_cart: Option<bool>,
}

impl ProductView {
    pub fn with_flags(product: Product, heart: bool, in_cart: bool) -> Self {
        Self {
            heart: Some(heart),
            in_cart: Some(in_cart),
            ..Self::from(product)
        }
    }
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            key: product.id,
            product,
            heart: None,
            in_cart: None,
        }
    }
}

/// Number of products in one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Query string accepted by the product search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub categories: Option<String>,
    pub limit: Option<String>,
}

/// Normalized search filter handed to the catalog repository
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    /// Category names to match; empty means every category
    pub categories: Vec<String>,
    /// `ILIKE` pattern for the product name
    pub name_pattern: Option<String>,
    pub limit: i64,
}

impl ProductFilter {
    pub fn from_query(query: &ProductQuery) -> Self {
        let categories = parse_categories(&[query.categories.as_deref(), query.category.as_deref()]);

        let term = [query.q.as_deref(), query.search.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|term| !term.is_empty());

        Self {
            categories,
            name_pattern: term.map(|term| format!("%{}%", escape_like(term))),
            limit: sanitize_limit(query.limit.as_deref(), DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT),
        }
    }
}

/// Map a category to its canonical name; unknown names pass through unchanged
pub fn normalize_category(raw: &str) -> String {
    Category::from_alias(raw)
        .map(|category| category.as_str().to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Split comma separated category lists, normalize and de-duplicate them
pub fn parse_categories(sources: &[Option<&str>]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    for part in sources
        .iter()
        .flatten()
        .flat_map(|source| source.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
    {
        let category = normalize_category(part);
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    categories
}

/// Parse a positive limit, falling back to `default` and capping at `max`
pub fn sanitize_limit(raw: Option<&str>, default: i64, max: i64) -> i64 {
    match raw.and_then(|value| value.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => n.min(max),
        _ => default,
    }
}

/// Escape `LIKE` wildcards so the term matches literally
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

//! Catalog repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{CategoryCount, Product, ProductFilter};

fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        stock: row.get("stock"),
        category_id: row.get("category_id"),
        image: row.get("image"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Products matching a category/name filter, sorted by name
    pub async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, stock, category_id, image, created_at, updated_at
            FROM products
            WHERE (cardinality($1::text[]) = 0 OR category_id = ANY($1))
              AND ($2::text IS NULL OR name ILIKE $2 ESCAPE '\')
            ORDER BY name ASC
            LIMIT $3
            "#,
        )
        .bind(&filter.categories)
        .bind(filter.name_pattern.as_deref())
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Products with the given ids, sorted by name
    ///
    /// Ids without a matching product are skipped.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, name, price, stock, category_id, image, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            ORDER BY name ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Number of products per category, sorted by category
    pub async fn category_counts(&self) -> Result<Vec<CategoryCount>> {
        let rows = sqlx::query(
            r#"
            SELECT category_id AS category, COUNT(*) AS count
            FROM products
            GROUP BY category_id
            ORDER BY category_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| CategoryCount {
                category: row.get("category"),
                count: row.get("count"),
            })
            .collect())
    }
}

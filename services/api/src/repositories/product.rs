//! Product repository for database operations

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::GroupCount;
use crate::models::product::{
    CreateProductRequest, Product, ProductQuery, ProductSummary, UNCATEGORIZED,
    UpdateProductRequest, default_category,
};
use crate::stats::{GROUP_LIMIT, ProductMetrics, RECENT_LIMIT, WINDOW_DAYS, WindowCounts};

/// Product repository for database operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

fn row_to_product(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        category: row.get("category"),
        price: row.get("price"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product
    pub async fn create(&self, payload: &CreateProductRequest) -> Result<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, description, category, price, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, category, price, is_active, created_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(payload.price)
        .bind(payload.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_product(&row))
    }

    /// Get products with pagination and an optional category filter
    pub async fn get_products(&self, query: &ProductQuery) -> Result<(Vec<Product>, i64)> {
        let page = query.page();
        let limit = query.limit();
        let offset = (page - 1) as i64 * limit as i64;

        let (rows, count) = match &query.category {
            Some(category) => {
                let rows = sqlx::query(
                    r#"
                    SELECT id, name, description, category, price, is_active, created_at
                    FROM products
                    WHERE category = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(category)
                .bind(limit as i64)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let count: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category = $1")
                        .bind(category)
                        .fetch_one(&self.pool)
                        .await?;

                (rows, count)
            }
            None => {
                let rows = sqlx::query(
                    r#"
                    SELECT id, name, description, category, price, is_active, created_at
                    FROM products
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit as i64)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
                    .fetch_one(&self.pool)
                    .await?;

                (rows, count)
            }
        };

        let products = rows.iter().map(row_to_product).collect();

        Ok((products, count))
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, category, price, is_active, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_product))
    }

    /// Update a product; absent fields keep their current values
    pub async fn update(&self, id: Uuid, payload: &UpdateProductRequest) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                is_active = COALESCE($6, is_active)
            WHERE id = $1
            RETURNING id, name, description, category, price, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(payload.price)
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_product))
    }

    /// Delete a product by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Collect the dashboard metrics for products
    pub async fn dashboard_metrics(&self, now: DateTime<Utc>) -> Result<ProductMetrics> {
        let window_start = now - Duration::days(WINDOW_DAYS);
        let prior_start = now - Duration::days(2 * WINDOW_DAYS);

        let total_q =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products").fetch_one(&self.pool);
        let active_q =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE is_active")
                .fetch_one(&self.pool);
        let categories_q = sqlx::query(
            r#"
            SELECT COALESCE(category, $1) AS name, COUNT(*) AS count
            FROM products
            GROUP BY COALESCE(category, $1)
            ORDER BY count DESC, name ASC
            LIMIT $2
            "#,
        )
        .bind(UNCATEGORIZED)
        .bind(GROUP_LIMIT)
        .fetch_all(&self.pool);
        let recent_q = sqlx::query(
            r#"
            SELECT id, name, category, price, created_at
            FROM products
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_LIMIT)
        .fetch_all(&self.pool);
        let current_q =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE created_at >= $1")
                .bind(window_start)
                .fetch_one(&self.pool);
        let prior_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(prior_start)
        .bind(window_start)
        .fetch_one(&self.pool);

        let (total, active, category_rows, recent_rows, current, prior) = tokio::try_join!(
            total_q,
            active_q,
            categories_q,
            recent_q,
            current_q,
            prior_q
        )?;

        let categories = category_rows
            .into_iter()
            .map(|row| GroupCount {
                name: row.get("name"),
                count: row.get("count"),
            })
            .collect();

        let recent = recent_rows
            .into_iter()
            .map(|row| ProductSummary {
                id: row.get("id"),
                name: row.get("name"),
                category: default_category(row.get("category")),
                price: row.get::<Option<f64>, _>("price").unwrap_or(0.0),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(ProductMetrics {
            total,
            active,
            categories,
            recent,
            windows: WindowCounts { current, prior },
        })
    }
}

//! `SQLite` implementation of [`ProductRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use gymhub_app::ports::ProductRepository;
use gymhub_domain::error::{GymHubError, NotFoundError};
use gymhub_domain::id::ProductId;
use gymhub_domain::page::{Page, PageRequest};
use gymhub_domain::product::{NewProduct, Product, ProductFilter};
use gymhub_domain::time::now;

use crate::error::StorageError;
use crate::query::{fetch_page, push_like};
use crate::rows::{decode_error, timestamp};

/// Wrapper for converting database rows into domain [`Product`].
struct Wrapper(Product);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Product> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let images_json: String = row.try_get("images")?;
        let images: Vec<String> = serde_json::from_str(&images_json).map_err(decode_error)?;

        Ok(Self(Product {
            id: ProductId::new(row.try_get("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            color: row.try_get("color")?,
            composition: row.try_get("composition")?,
            images,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO products (title, description, price, color, composition, images, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM products WHERE id = ?";
const COUNT: &str = "SELECT COUNT(*) FROM products";
const UPDATE: &str = r"
    UPDATE products
    SET title = ?, description = ?, price = ?, color = ?, composition = ?, images = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM products WHERE id = ?";

fn not_found(id: ProductId) -> GymHubError {
    NotFoundError {
        entity: "Product",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed product repository.
#[derive(Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(Wrapper::maybe(row))
    }
}

impl ProductRepository for SqliteProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, GymHubError> {
        let images_json = serde_json::to_string(&product.images).map_err(StorageError::from)?;
        let ts = now().to_rfc3339();

        let result = sqlx::query(INSERT)
            .bind(&product.title)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.color)
            .bind(&product.composition)
            .bind(&images_json)
            .bind(&ts)
            .bind(&ts)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let id = ProductId::new(result.last_insert_rowid());
        self.fetch(id).await?.ok_or_else(|| not_found(id))
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, GymHubError> {
        Ok(self.fetch(id).await?)
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, GymHubError> {
        let rows: Page<Wrapper> = fetch_page(&self.pool, "products", "id", page, |builder| {
            if let Some(title) = &filter.title {
                push_like(builder, "title", title);
            }
            if let Some(min) = filter.min_price {
                builder.push(" AND price >= ").push_bind(min);
            }
            if let Some(max) = filter.max_price {
                builder.push(" AND price <= ").push_bind(max);
            }
        })
        .await
        .map_err(StorageError::from)?;

        Ok(rows.map(|w| w.0))
    }

    async fn update(&self, product: Product) -> Result<Product, GymHubError> {
        let images_json = serde_json::to_string(&product.images).map_err(StorageError::from)?;

        let result = sqlx::query(UPDATE)
            .bind(&product.title)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.color)
            .bind(&product.composition)
            .bind(&images_json)
            .bind(now().to_rfc3339())
            .bind(product.id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(not_found(product.id));
        }

        self.fetch(product.id)
            .await?
            .ok_or_else(|| not_found(product.id))
    }

    async fn delete(&self, id: ProductId) -> Result<(), GymHubError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, GymHubError> {
        let count: i64 = sqlx::query_scalar(COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `products` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Product::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Delete is a tombstone: the row survives so referencing orders keep
//!   resolving it for pricing.

use crate::db::DbError;
use crate::model::product::{Product, ProductId, ProductValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PRODUCT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    price_cents,
    image_ref,
    model_ref,
    is_deleted
FROM products";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog store error for product persistence and query operations.
#[derive(Debug)]
pub enum CatalogError {
    Validation(ProductValidationError),
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ProductValidationError> for CatalogError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Case-insensitive substring match on the product name.
    pub name_contains: Option<String>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for product CRUD operations.
pub trait ProductRepository {
    fn create_product(&self, product: &Product) -> CatalogResult<ProductId>;
    fn update_product(&self, product: &Product) -> CatalogResult<()>;
    fn get_product(&self, id: ProductId, include_deleted: bool) -> CatalogResult<Option<Product>>;
    fn list_products(&self, query: &ProductListQuery) -> CatalogResult<Vec<Product>>;
    fn soft_delete_product(&self, id: ProductId) -> CatalogResult<()>;
    fn restore_product(&self, id: ProductId) -> CatalogResult<()>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, product: &Product) -> CatalogResult<ProductId> {
        product.validate()?;

        self.conn.execute(
            "INSERT INTO products (
                uuid,
                name,
                description,
                price_cents,
                image_ref,
                model_ref,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                product.uuid.to_string(),
                product.name.as_str(),
                product.description.as_str(),
                product.price_cents,
                product.image_ref.as_str(),
                product.model_ref.as_deref(),
                bool_to_int(product.is_deleted),
            ],
        )?;

        Ok(product.uuid)
    }

    fn update_product(&self, product: &Product) -> CatalogResult<()> {
        product.validate()?;

        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                description = ?2,
                price_cents = ?3,
                image_ref = ?4,
                model_ref = ?5,
                is_deleted = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                product.name.as_str(),
                product.description.as_str(),
                product.price_cents,
                product.image_ref.as_str(),
                product.model_ref.as_deref(),
                bool_to_int(product.is_deleted),
                product.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(CatalogError::NotFound(product.uuid));
        }

        Ok(())
    }

    fn get_product(&self, id: ProductId, include_deleted: bool) -> CatalogResult<Option<Product>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn list_products(&self, query: &ProductListQuery) -> CatalogResult<Vec<Product>> {
        let mut sql = format!("{PRODUCT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }

        if let Some(fragment) = query.name_contains.as_ref() {
            sql.push_str(" AND name LIKE '%' || ? || '%'");
            bind_values.push(Value::Text(fragment.clone()));
        }

        sql.push_str(" ORDER BY uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn soft_delete_product(&self, id: ProductId) -> CatalogResult<()> {
        let changed = self.conn.execute(
            "UPDATE products
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(CatalogError::NotFound(id));
        }

        Ok(())
    }

    fn restore_product(&self, id: ProductId) -> CatalogResult<()> {
        let changed = self.conn.execute(
            "UPDATE products
             SET
                is_deleted = 0,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(CatalogError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_product_row(row: &Row<'_>) -> CatalogResult<Product> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        CatalogError::InvalidData(format!("invalid uuid value `{uuid_text}` in products.uuid"))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(CatalogError::InvalidData(format!(
                "invalid is_deleted value `{other}` in products.is_deleted"
            )));
        }
    };

    let product = Product {
        uuid,
        name: row.get("name")?,
        description: row.get("description")?,
        price_cents: row.get("price_cents")?,
        image_ref: row.get("image_ref")?,
        model_ref: row.get("model_ref")?,
        is_deleted,
    };
    product.validate()?;
    Ok(product)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

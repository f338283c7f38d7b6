//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete APIs over canonical `products` storage.
//! - Provide the paging primitive behind lazy single-field queries.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Product::validate()` before SQL mutations.
//! - Every create/update runs in one immediate transaction; a failure rolls
//!   back and leaves the in-memory value untouched.
//! - Read paths must reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::category::Category;
use crate::model::product::{Product, ProductId, ProductValidationError, PRICE_SCALE};
use crate::repo::product_query::{ProductFilter, ProductQuery};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    price,
    available,
    category
FROM products";

const REQUIRED_COLUMNS: [&str; 6] = [
    "id",
    "name",
    "description",
    "price",
    "available",
    "category",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProductValidationError),
    Db(DbError),
    /// Update targeted an id with no stored row.
    NotFound(ProductId),
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "product repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "product repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "product repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ProductValidationError> for RepoError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for product lifecycle and query operations.
pub trait ProductRepository {
    /// Inserts a transient product and writes the assigned id back onto it.
    fn create(&self, product: &mut Product) -> RepoResult<ProductId>;
    /// Overwrites the stored row matching `product.id`.
    fn update(&self, product: &Product) -> RepoResult<()>;
    /// Removes the stored row matching `product.id`; missing rows are a no-op.
    fn delete(&self, product: &Product) -> RepoResult<()> {
        self.delete_by_id(product.require_id()?)
    }
    fn delete_by_id(&self, id: ProductId) -> RepoResult<()>;
    /// Removes every product. Returns the number of deleted rows.
    fn delete_all(&self) -> RepoResult<u64>;
    fn find(&self, id: ProductId) -> RepoResult<Option<Product>>;
    /// Counts rows matching `filter`.
    fn count_matching(&self, filter: &ProductFilter) -> RepoResult<u64>;
    /// Loads up to `limit` rows matching `filter` with `id > after_id`,
    /// ordered by id.
    fn fetch_page(
        &self,
        filter: &ProductFilter,
        after_id: Option<ProductId>,
        limit: u32,
    ) -> RepoResult<Vec<Product>>;

    /// Returns every stored product ordered by id.
    fn all(&self) -> RepoResult<Vec<Product>>
    where
        Self: Sized,
    {
        ProductQuery::new(self, ProductFilter::All).fetch_all()
    }

    fn count(&self) -> RepoResult<u64> {
        self.count_matching(&ProductFilter::All)
    }

    fn find_by_name(&self, name: &str) -> ProductQuery<'_, Self>
    where
        Self: Sized,
    {
        ProductQuery::new(self, ProductFilter::Name(name.to_string()))
    }

    fn find_by_availability(&self, available: bool) -> ProductQuery<'_, Self>
    where
        Self: Sized,
    {
        ProductQuery::new(self, ProductFilter::Available(available))
    }

    fn find_by_category(&self, category: Category) -> ProductQuery<'_, Self>
    where
        Self: Sized,
    {
        ProductQuery::new(self, ProductFilter::Category(category))
    }

    /// Matches on decimal equality, so `12.5` finds a row stored as `12.50`.
    fn find_by_price(&self, price: Decimal) -> ProductQuery<'_, Self>
    where
        Self: Sized,
    {
        ProductQuery::new(self, ProductFilter::Price(price))
    }
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_product_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create(&self, product: &mut Product) -> RepoResult<ProductId> {
        product.ensure_transient()?;
        product.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO products (
                name,
                description,
                price,
                available,
                category
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                product.name.as_str(),
                product.description.as_str(),
                price_to_db(product.price),
                bool_to_int(product.available),
                product.category.as_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        product.id = Some(id);
        info!("event=product_create module=repo status=ok id={id}");
        Ok(id)
    }

    fn update(&self, product: &Product) -> RepoResult<()> {
        let id = product.require_id()?;
        product.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE products
             SET
                name = ?1,
                description = ?2,
                price = ?3,
                available = ?4,
                category = ?5
             WHERE id = ?6;",
            params![
                product.name.as_str(),
                product.description.as_str(),
                price_to_db(product.price),
                bool_to_int(product.available),
                product.category.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            info!("event=product_update module=repo status=error id={id} error_code=not_found");
            return Err(RepoError::NotFound(id));
        }

        tx.commit()?;
        info!("event=product_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete_by_id(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        info!("event=product_delete module=repo status=ok id={id} rows={changed}");
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<u64> {
        let changed = self.conn.execute("DELETE FROM products;", [])?;
        info!("event=product_delete_all module=repo status=ok rows={changed}");
        Ok(changed as u64)
    }

    fn find(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn count_matching(&self, filter: &ProductFilter) -> RepoResult<u64> {
        let (clause, bind_values) = filter_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM products WHERE {clause};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }

    fn fetch_page(
        &self,
        filter: &ProductFilter,
        after_id: Option<ProductId>,
        limit: u32,
    ) -> RepoResult<Vec<Product>> {
        let (clause, mut bind_values) = filter_clause(filter);
        let mut sql = format!("{PRODUCT_SELECT_SQL} WHERE {clause}");

        if let Some(after_id) = after_id {
            sql.push_str(" AND id > ?");
            bind_values.push(Value::Integer(after_id));
        }

        sql.push_str(" ORDER BY id ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }
}

fn filter_clause(filter: &ProductFilter) -> (&'static str, Vec<Value>) {
    match filter {
        ProductFilter::All => ("1 = 1", Vec::new()),
        ProductFilter::Name(name) => ("name = ?", vec![Value::Text(name.clone())]),
        ProductFilter::Available(available) => (
            "available = ?",
            vec![Value::Integer(bool_to_int(*available))],
        ),
        ProductFilter::Category(category) => (
            "category = ?",
            vec![Value::Text(category.as_str().to_string())],
        ),
        // No stored row can hold more fractional digits than the column scale.
        ProductFilter::Price(price) if price.normalize().scale() > PRICE_SCALE => {
            ("0 = 1", Vec::new())
        }
        ProductFilter::Price(price) => ("price = ?", vec![Value::Text(price_to_db(*price))]),
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let price_text: String = row.get("price")?;
    let mut price = price_text.parse::<Decimal>().map_err(|_| {
        RepoError::InvalidData(format!("invalid price value `{price_text}` in products.price"))
    })?;
    price.rescale(PRICE_SCALE);

    let category_text: String = row.get("category")?;
    let category = Category::parse(&category_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in products.category"
        ))
    })?;

    let available = match row.get::<_, i64>("available")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid available value `{other}` in products.available"
            )));
        }
    };

    let product = Product {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        description: row.get("description")?,
        price,
        available,
        category,
    };
    product.validate()?;
    Ok(product)
}

/// Canonical text form stored in `products.price`.
///
/// Always `PRICE_SCALE` fractional digits, so equal decimals compare equal
/// as text. Callers validate the scale first; `rescale` never rounds here.
fn price_to_db(price: Decimal) -> String {
    let mut fixed = if price.is_zero() { Decimal::ZERO } else { price };
    fixed.rescale(PRICE_SCALE);
    fixed.to_string()
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_product_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "products")? {
        return Err(RepoError::MissingRequiredTable("products"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "products", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "products",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

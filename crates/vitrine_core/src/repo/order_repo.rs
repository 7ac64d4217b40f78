//! Order repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide append-and-mutate APIs over canonical `orders` storage.
//! - Enforce the status transition rule on every persisted mutation.
//!
//! # Invariants
//! - Write paths must call `Order::validate()` before SQL mutations.
//! - Rows are never deleted; the ledger is an audit trail.
//! - `update_order_status` commits via compare-and-set on the previously
//!   observed status, so concurrent writers can never co-commit a
//!   transition that violates the forward/cancel rule.

use crate::db::DbError;
use crate::model::order::{Order, OrderId, OrderStatus, OrderValidationError, PurchaserId};
use crate::model::product::ProductId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ORDER_SELECT_SQL: &str = "SELECT
    uuid,
    purchaser_uuid,
    product_uuid,
    quantity,
    status,
    created_at
FROM orders";

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Order ledger error for persistence, lookup and transition operations.
#[derive(Debug)]
pub enum LedgerError {
    Validation(OrderValidationError),
    Db(DbError),
    NotFound(OrderId),
    ProductNotFound(ProductId),
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    InvalidData(String),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "order not found: {id}"),
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidTransition { from, to } => write!(
                f,
                "invalid order status transition {} -> {}",
                from.as_str(),
                to.as_str()
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted order data: {message}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OrderValidationError> for LedgerError {
    fn from(value: OrderValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for LedgerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    pub purchaser: Option<PurchaserId>,
    pub status: Option<OrderStatus>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for order ledger operations.
pub trait OrderRepository {
    fn create_order(&self, order: &Order) -> LedgerResult<OrderId>;
    fn get_order(&self, id: OrderId) -> LedgerResult<Option<Order>>;
    fn list_orders(&self, query: &OrderListQuery) -> LedgerResult<Vec<Order>>;
    fn update_order_status(&self, id: OrderId, new_status: OrderStatus) -> LedgerResult<Order>;
}

/// SQLite-backed order repository.
pub struct SqliteOrderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrderRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl OrderRepository for SqliteOrderRepository<'_> {
    fn create_order(&self, order: &Order) -> LedgerResult<OrderId> {
        order.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO orders (
                uuid,
                purchaser_uuid,
                product_uuid,
                quantity,
                status,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                order.uuid.to_string(),
                order.purchaser.to_string(),
                order.product.to_string(),
                i64::from(order.quantity),
                order.status.as_str(),
                order.created_at_ms,
            ],
        );

        match inserted {
            Ok(_) => Ok(order.uuid),
            // The foreign key is the storage-level backstop for the
            // existence check performed by the service layer.
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Err(LedgerError::ProductNotFound(order.product))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_order(&self, id: OrderId) -> LedgerResult<Option<Order>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ORDER_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_order_row(row)?));
        }

        Ok(None)
    }

    fn list_orders(&self, query: &OrderListQuery) -> LedgerResult<Vec<Order>> {
        let mut sql = format!("{ORDER_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(purchaser) = query.purchaser {
            sql.push_str(" AND purchaser_uuid = ?");
            bind_values.push(Value::Text(purchaser.to_string()));
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at ASC, uuid ASC");

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
        let mut orders = Vec::new();

        while let Some(row) = rows.next()? {
            orders.push(parse_order_row(row)?);
        }

        Ok(orders)
    }

    fn update_order_status(&self, id: OrderId, new_status: OrderStatus) -> LedgerResult<Order> {
        loop {
            let current = match self.get_order(id)? {
                Some(order) => order,
                None => return Err(LedgerError::NotFound(id)),
            };

            if !current.status.can_transition_to(new_status) {
                return Err(LedgerError::InvalidTransition {
                    from: current.status,
                    to: new_status,
                });
            }

            let changed = self.conn.execute(
                "UPDATE orders
                 SET
                    status = ?2,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1
                   AND status = ?3;",
                params![
                    id.to_string(),
                    new_status.as_str(),
                    current.status.as_str(),
                ],
            )?;

            if changed == 1 {
                return Ok(Order {
                    status: new_status,
                    ..current
                });
            }

            // A concurrent writer moved the status between the read and
            // the write; re-read and re-validate against the fresh state.
        }
    }
}

fn parse_order_row(row: &Row<'_>) -> LedgerResult<Order> {
    let uuid = parse_uuid_column(row, "uuid")?;
    let purchaser = parse_uuid_column(row, "purchaser_uuid")?;
    let product = parse_uuid_column(row, "product_uuid")?;

    let quantity_raw: i64 = row.get("quantity")?;
    let quantity = u32::try_from(quantity_raw).map_err(|_| {
        LedgerError::InvalidData(format!(
            "invalid quantity value `{quantity_raw}` in orders.quantity"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = OrderStatus::parse(&status_text).ok_or_else(|| {
        LedgerError::InvalidData(format!("invalid status value `{status_text}` in orders.status"))
    })?;

    let order = Order {
        uuid,
        purchaser,
        product,
        quantity,
        status,
        created_at_ms: row.get("created_at")?,
    };
    order.validate()?;
    Ok(order)
}

fn parse_uuid_column(row: &Row<'_>, column: &str) -> LedgerResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        LedgerError::InvalidData(format!("invalid uuid value `{text}` in orders.{column}"))
    })
}

//! Order ledger use-case service.
//!
//! # Responsibility
//! - Place orders after checking the referenced product is purchasable.
//! - Compute order totals against the product's current price.
//!
//! # Invariants
//! - An order is only created when its product resolves to an active
//!   catalog row at creation time.
//! - Totals are computed on read, never stored; tombstoned products still
//!   price the orders that reference them.

use crate::model::order::{Order, OrderId, OrderStatus, PurchaserId};
use crate::model::product::ProductId;
use crate::repo::order_repo::{LedgerError, LedgerResult, OrderListQuery, OrderRepository};
use crate::repo::product_repo::{CatalogError, ProductRepository};

/// Use-case service composing the catalog store and the order ledger.
pub struct OrderService<P: ProductRepository, O: OrderRepository> {
    products: P,
    orders: O,
}

impl<P: ProductRepository, O: OrderRepository> OrderService<P, O> {
    /// Creates a service using the provided repository implementations.
    pub fn new(products: P, orders: O) -> Self {
        Self { products, orders }
    }

    /// Places a new pending order for `quantity` units of `product_id`.
    ///
    /// # Contract
    /// - Fails with `ProductNotFound` when the product is missing or
    ///   tombstoned.
    /// - Fails with `Validation` when `quantity` is 0.
    /// - Has no side effect on the catalog (no stock decrement).
    pub fn place_order(
        &self,
        purchaser: PurchaserId,
        product_id: ProductId,
        quantity: u32,
    ) -> LedgerResult<Order> {
        let product = self
            .products
            .get_product(product_id, false)
            .map_err(ledger_error_from_catalog)?;
        if product.is_none() {
            return Err(LedgerError::ProductNotFound(product_id));
        }

        let order = Order::new(purchaser, product_id, quantity);
        self.orders.create_order(&order)?;
        Ok(order)
    }

    /// Gets one order by stable ID.
    pub fn get_order(&self, id: OrderId) -> LedgerResult<Option<Order>> {
        self.orders.get_order(id)
    }

    /// Lists orders using purchaser/status filters and pagination.
    pub fn list_orders(&self, query: &OrderListQuery) -> LedgerResult<Vec<Order>> {
        self.orders.list_orders(query)
    }

    /// Moves an order to `new_status`, enforcing the transition rule.
    pub fn update_status(&self, id: OrderId, new_status: OrderStatus) -> LedgerResult<Order> {
        self.orders.update_order_status(id, new_status)
    }

    /// Computes the order total in minor units against the product's
    /// current price. Pure projection; nothing is stored.
    ///
    /// Tombstoned products are still consulted so the ledger keeps pricing
    /// its history. Fails with `ProductNotFound` only when the product row
    /// is gone entirely.
    pub fn total_cents(&self, id: OrderId) -> LedgerResult<i64> {
        let order = self
            .orders
            .get_order(id)?
            .ok_or(LedgerError::NotFound(id))?;

        let product = self
            .products
            .get_product(order.product, true)
            .map_err(ledger_error_from_catalog)?
            .ok_or(LedgerError::ProductNotFound(order.product))?;

        Ok(product.price_cents * i64::from(order.quantity))
    }
}

fn ledger_error_from_catalog(err: CatalogError) -> LedgerError {
    match err {
        CatalogError::NotFound(id) => LedgerError::ProductNotFound(id),
        CatalogError::Db(db) => LedgerError::Db(db),
        CatalogError::InvalidData(message) => LedgerError::InvalidData(message),
        // A product failing its own validation on read is corrupt state
        // from the ledger's point of view.
        CatalogError::Validation(inner) => LedgerError::InvalidData(inner.to_string()),
    }
}

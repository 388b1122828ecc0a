//! # Order Repository
//!
//! Order persistence and the transactional checkout.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      checkout(): one transaction                        │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. replay probe ── idempotency key already stored? ──► return saved  │
//! │    2. shift gate ──── no OPEN shift for (cashier, day)? ─► ROLLBACK     │
//! │                       (nothing persisted, not even the order)           │
//! │    3. INSERT order                                                      │
//! │    4. net_cash > 0? ─ atomic balance UPDATE ... RETURNING               │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The order row and the ledger delta land together or not at all;        │
//! │  a crash between the two can never leave an orphaned sale.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use resto_core::{BusinessDay, CashierId, Money, Order, OrderLine, OrderStatus, OrderType};

/// Row shape of the `orders` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRow {
    id: String,
    items: String,
    total_cents: i64,
    status: String,
    order_type: String,
    cashier_id: Option<String>,
    cashier_name: Option<String>,
    payment_received_cents: Option<i64>,
    payment_method: Option<String>,
    change_cents: Option<i64>,
    idempotency_key: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> DbResult<Order> {
        let items: Vec<OrderLine> = serde_json::from_str(&self.items)
            .map_err(|e| DbError::Internal(format!("malformed items payload: {e}")))?;

        Ok(Order {
            id: self.id,
            items,
            total: Money::from_cents(self.total_cents),
            status: OrderStatus::from_tag(Some(self.status.as_str())),
            order_type: OrderType::from_tag(Some(self.order_type.as_str())),
            cashier: self.cashier_id.map(CashierId::new),
            cashier_name: self.cashier_name,
            payment_received: self.payment_received_cents.map(Money::from_cents),
            payment_method: self.payment_method,
            change: self.change_cents.map(Money::from_cents),
            idempotency_key: self.idempotency_key,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, items, total_cents, status, order_type, cashier_id, \
     cashier_name, payment_received_cents, payment_method, change_cents, idempotency_key, \
     created_at, updated_at";

/// Input for [`OrderRepository::checkout`]. Totals and settlement amounts
/// are computed by the caller before the transaction starts.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub cashier: CashierId,
    pub cashier_name: Option<String>,
    pub business_day: BusinessDay,
    pub items: Vec<OrderLine>,
    pub total: Money,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub payment_received: Option<Money>,
    pub payment_method: Option<String>,
    pub change: Option<Money>,
    /// Cash amount to add to the shift ledger. Zero for non-cash sales.
    pub net_cash: Money,
    pub idempotency_key: Option<String>,
}

/// Result of a checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub change: Money,
    /// Ledger balance after this sale. For sales that move no cash this is
    /// the unchanged pre-sale balance; `None` only for replays of an
    /// earlier submission.
    pub new_balance: Option<Money>,
    /// True when an idempotency key matched an already-stored order.
    pub replayed: bool,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

/// Listing filter for [`OrderRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Substring match against stored line-item names.
    pub q: Option<String>,
    pub order_type: Option<OrderType>,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl OrderFilter {
    const MAX_LIMIT: u32 = 200;
    const DEFAULT_LIMIT: u32 = 20;

    fn effective_limit(&self) -> i64 {
        match self.limit {
            0 => Self::DEFAULT_LIMIT as i64,
            n => n.min(Self::MAX_LIMIT) as i64,
        }
    }

    fn offset(&self) -> i64 {
        let page = self.page.max(1) as i64;
        (page - 1) * self.effective_limit()
    }
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Records a sale and settles the cash ledger in one transaction.
    ///
    /// The shift gate runs first: when the cashier has no OPEN shift for the
    /// business day the whole transaction rolls back, so a rejected checkout
    /// leaves no order row behind. Cash movement uses the same atomic
    /// UPDATE as [`crate::repository::shift::ShiftRepository::apply_cash_delta`],
    /// executed inside this transaction.
    ///
    /// A repeated `idempotency_key` returns the stored order instead of
    /// creating a duplicate.
    pub async fn checkout(&self, new_order: NewOrder) -> DbResult<CheckoutOutcome> {
        let mut tx = self.pool.begin().await?;

        // Replay probe. The partial unique index is the authority; this
        // read just makes the common replay path cheap and quiet.
        if let Some(key) = new_order.idempotency_key.as_deref() {
            if let Some(existing) = Self::find_by_key(&mut tx, key).await? {
                tx.commit().await?;
                debug!(key, order_id = %existing.id, "Checkout replayed");
                let change = existing.change.unwrap_or_else(Money::zero);
                return Ok(CheckoutOutcome {
                    order: existing,
                    change,
                    new_balance: None,
                    replayed: true,
                });
            }
        }

        // Shift gate: the sale is refused before anything is written. The
        // balance read here doubles as the reported balance for sales that
        // move no cash.
        let shift_state: Option<(Option<DateTime<Utc>>, i64, Option<i64>)> = sqlx::query_as(
            "SELECT closed_at, opening_cents, balance_cents FROM shift_records \
             WHERE owner_id = ?1 AND business_day = ?2",
        )
        .bind(new_order.cashier.as_str())
        .bind(new_order.business_day.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        let pre_balance = match shift_state {
            None => {
                return Err(DbError::ShiftNotOpen {
                    day: new_order.business_day,
                })
            }
            Some((Some(_), _, _)) => {
                return Err(DbError::ShiftClosed {
                    day: new_order.business_day,
                })
            }
            Some((None, opening, balance)) => Money::from_cents(balance.unwrap_or(opening)),
        };

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let items_json = serde_json::to_string(&new_order.items)
            .map_err(|e| DbError::Internal(format!("items serialization failed: {e}")))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO orders (
                id, items, total_cents, status, order_type, cashier_id,
                cashier_name, payment_received_cents, payment_method,
                change_cents, idempotency_key, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
            "#,
        )
        .bind(&id)
        .bind(&items_json)
        .bind(new_order.total.cents())
        .bind(new_order.status.as_str())
        .bind(new_order.order_type.as_str())
        .bind(new_order.cashier.as_str())
        .bind(new_order.cashier_name.as_deref())
        .bind(new_order.payment_received.map(|m| m.cents()))
        .bind(new_order.payment_method.as_deref())
        .bind(new_order.change.map(|m| m.cents()))
        .bind(new_order.idempotency_key.as_deref())
        .bind(now)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            let db_err = DbError::from(err);
            // Two concurrent submissions with the same key: the loser
            // re-reads the winner's order and reports a replay.
            if db_err.is_unique_violation() {
                if let Some(key) = new_order.idempotency_key.as_deref() {
                    tx.rollback().await?;
                    let mut tx = self.pool.begin().await?;
                    if let Some(existing) = Self::find_by_key(&mut tx, key).await? {
                        tx.commit().await?;
                        let change = existing.change.unwrap_or_else(Money::zero);
                        return Ok(CheckoutOutcome {
                            order: existing,
                            change,
                            new_balance: None,
                            replayed: true,
                        });
                    }
                }
            }
            return Err(db_err);
        }

        // Cash movement, same transaction as the order row. A sale that
        // moves no cash reports the untouched pre-sale balance.
        let new_balance = if new_order.net_cash.is_positive() {
            let balance: Option<i64> = sqlx::query_scalar(
                r#"
                UPDATE shift_records
                SET balance_cents = COALESCE(balance_cents, opening_cents) + ?1,
                    updated_at = ?2
                WHERE owner_id = ?3 AND business_day = ?4 AND closed_at IS NULL
                RETURNING balance_cents
                "#,
            )
            .bind(new_order.net_cash.cents())
            .bind(now)
            .bind(new_order.cashier.as_str())
            .bind(new_order.business_day.to_string())
            .fetch_optional(&mut *tx)
            .await?;

            match balance {
                Some(b) => Some(Money::from_cents(b)),
                // The gate above saw an open shift inside this same
                // transaction, so the ledger row cannot have gone away.
                None => {
                    return Err(DbError::Internal(
                        "shift ledger rejected the settlement".to_string(),
                    ))
                }
            }
        } else {
            Some(pre_balance)
        };

        tx.commit().await?;

        debug!(
            order_id = %id,
            total = %new_order.total,
            net_cash = %new_order.net_cash,
            "Checkout committed"
        );

        let order = Order {
            id,
            items: new_order.items,
            total: new_order.total,
            status: new_order.status,
            order_type: new_order.order_type,
            cashier: Some(new_order.cashier),
            cashier_name: new_order.cashier_name,
            payment_received: new_order.payment_received,
            payment_method: new_order.payment_method,
            change: new_order.change,
            idempotency_key: new_order.idempotency_key,
            created_at: now,
            updated_at: now,
        };
        let change = order.change.unwrap_or_else(Money::zero);

        Ok(CheckoutOutcome {
            order,
            change,
            new_balance,
            replayed: false,
        })
    }

    async fn find_by_key(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        key: &str,
    ) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE idempotency_key = ?1"
        ))
        .bind(key)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Fetches one order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Order> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_order(),
            None => Err(DbError::not_found("order", id)),
        }
    }

    /// Lists orders newest-first with an item-name search and a channel
    /// filter. Returns the page plus the total match count.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<(Vec<Order>, i64)> {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.q.is_some() {
            conditions.push("items LIKE ?");
        }
        if filter.order_type.is_some() {
            conditions.push("order_type = ?");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let pattern = filter.q.as_deref().map(|q| format!("%{q}%"));
        let type_tag = filter.order_type.map(|t| t.as_str());

        let count_sql = format!("SELECT COUNT(*) FROM orders{where_clause}");
        let mut count_query = sqlx::query_scalar(&count_sql);
        if let Some(pattern) = pattern.as_deref() {
            count_query = count_query.bind(pattern);
        }
        if let Some(tag) = type_tag {
            count_query = count_query.bind(tag);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?;

        let page_sql = format!(
            "SELECT {SELECT_COLUMNS} FROM orders{where_clause} \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        );
        let mut page_query = sqlx::query_as(&page_sql);
        if let Some(pattern) = pattern.as_deref() {
            page_query = page_query.bind(pattern);
        }
        if let Some(tag) = type_tag {
            page_query = page_query.bind(tag);
        }
        let rows: Vec<OrderRow> = page_query
            .bind(filter.effective_limit())
            .bind(filter.offset())
            .fetch_all(&self.pool)
            .await?;

        let orders = rows
            .into_iter()
            .map(OrderRow::into_order)
            .collect::<DbResult<Vec<_>>>()?;

        Ok((orders, total))
    }

    /// Deletes an order. Returns false when no such order exists.
    ///
    /// History-management operation only: deleting an order does NOT
    /// reverse its cash movement on the shift ledger.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn day(s: &str) -> BusinessDay {
        s.parse().unwrap()
    }

    fn line(name: &str, price: i64, qty: i64) -> OrderLine {
        OrderLine {
            product_id: None,
            name: name.to_string(),
            price: Money::from_cents(price),
            qty,
        }
    }

    fn cash_order(owner: &CashierId, total: i64, paid: i64) -> NewOrder {
        NewOrder {
            cashier: owner.clone(),
            cashier_name: Some("Budi".to_string()),
            business_day: day("2024-06-01"),
            items: vec![line("Nasi Goreng", total, 1)],
            total: Money::from_cents(total),
            order_type: OrderType::DineIn,
            status: OrderStatus::Paid,
            payment_received: Some(Money::from_cents(paid)),
            payment_method: Some("cash".to_string()),
            change: Some(Money::from_cents((paid - total).max(0))),
            net_cash: Money::from_cents(paid.min(total)),
            idempotency_key: None,
        }
    }

    async fn open_shift(db: &Database, owner: &CashierId, opening: i64) {
        db.shifts()
            .open(owner, day("2024-06-01"), Money::from_cents(opening), "")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cash_checkout_moves_the_ledger() {
        // Rp 100.000 opening, Rp 45.000 sale paid with Rp 50.000 cash.
        let db = test_db().await;
        let owner = CashierId::new("cashier-1");
        open_shift(&db, &owner, 100000).await;

        let outcome = db
            .orders()
            .checkout(cash_order(&owner, 45000, 50000))
            .await
            .unwrap();

        assert!(!outcome.replayed);
        assert_eq!(outcome.change.cents(), 5000);
        assert_eq!(outcome.new_balance.unwrap().cents(), 145000);

        let shift = db
            .shifts()
            .get_for_day(&owner, day("2024-06-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shift.current_balance().cents(), 145000);
    }

    #[tokio::test]
    async fn test_non_cash_checkout_reports_unchanged_balance() {
        // A QRIS sale is recorded but the till never sees it: the outcome
        // still reports the pre-sale balance so the receipt can show it.
        let db = test_db().await;
        let owner = CashierId::new("cashier-1");
        open_shift(&db, &owner, 100000).await;

        let mut order = cash_order(&owner, 20000, 20000);
        order.payment_method = Some("qris".to_string());
        order.net_cash = Money::zero();
        order.change = Some(Money::zero());

        let outcome = db.orders().checkout(order).await.unwrap();
        assert_eq!(outcome.change.cents(), 0);
        assert_eq!(outcome.new_balance, Some(Money::from_cents(100000)));

        let shift = db
            .shifts()
            .get_for_day(&owner, day("2024-06-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shift.balance, None);
        assert_eq!(shift.current_balance().cents(), 100000);
    }

    #[tokio::test]
    async fn test_unpaid_checkout_reports_running_balance() {
        // Platform orders with no tendered amount settle off-ledger; the
        // reported balance is whatever the till already held.
        let db = test_db().await;
        let owner = CashierId::new("cashier-1");
        open_shift(&db, &owner, 100000).await;

        db.orders()
            .checkout(cash_order(&owner, 45000, 50000))
            .await
            .unwrap();

        let mut order = cash_order(&owner, 30000, 30000);
        order.payment_received = None;
        order.payment_method = None;
        order.change = None;
        order.net_cash = Money::zero();

        let outcome = db.orders().checkout(order).await.unwrap();
        assert_eq!(outcome.new_balance, Some(Money::from_cents(145000)));
    }

    #[tokio::test]
    async fn test_checkout_without_shift_persists_nothing() {
        // No open shift: the sale is refused and no order
        // row survives the rollback.
        let db = test_db().await;
        let owner = CashierId::new("cashier-1");

        let err = db
            .orders()
            .checkout(cash_order(&owner, 45000, 50000))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ShiftNotOpen { .. }), "got: {err:?}");

        let (orders, total) = db.orders().list(&OrderFilter::default()).await.unwrap();
        assert!(orders.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_checkout_against_closed_shift() {
        let db = test_db().await;
        let owner = CashierId::new("cashier-1");
        open_shift(&db, &owner, 100000).await;
        db.shifts()
            .close(&owner, day("2024-06-01"), None, None)
            .await
            .unwrap();

        let err = db
            .orders()
            .checkout(cash_order(&owner, 45000, 50000))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ShiftClosed { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn test_idempotent_replay() {
        let db = test_db().await;
        let owner = CashierId::new("cashier-1");
        open_shift(&db, &owner, 100000).await;

        let mut order = cash_order(&owner, 45000, 50000);
        order.idempotency_key = Some("receipt-0042".to_string());

        let first = db.orders().checkout(order.clone()).await.unwrap();
        assert!(!first.replayed);
        assert_eq!(first.new_balance.unwrap().cents(), 145000);

        // Resubmission: same order back, no second ledger movement.
        let second = db.orders().checkout(order).await.unwrap();
        assert!(second.replayed);
        assert_eq!(second.order.id, first.order.id);
        assert_eq!(second.change.cents(), 5000);
        assert_eq!(second.new_balance, None);

        let shift = db
            .shifts()
            .get_for_day(&owner, day("2024-06-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shift.current_balance().cents(), 145000);

        let (_, total) = db.orders().list(&OrderFilter::default()).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_get_list_delete() {
        let db = test_db().await;
        let owner = CashierId::new("cashier-1");
        open_shift(&db, &owner, 0).await;

        let mut a = cash_order(&owner, 20000, 20000);
        a.items = vec![line("Es Teh", 5000, 4)];
        let a = db.orders().checkout(a).await.unwrap().order;

        let mut b = cash_order(&owner, 30000, 30000);
        b.items = vec![line("Ayam Bakar", 30000, 1)];
        b.order_type = OrderType::GoFood;
        b.net_cash = Money::zero();
        let b = db.orders().checkout(b).await.unwrap().order;

        let fetched = db.orders().get_by_id(&a.id).await.unwrap();
        assert_eq!(fetched.items[0].name, "Es Teh");
        assert_eq!(fetched.total.cents(), 20000);

        let (hits, total) = db
            .orders()
            .list(&OrderFilter {
                q: Some("Ayam".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(hits[0].id, b.id);

        let (hits, total) = db
            .orders()
            .list(&OrderFilter {
                order_type: Some(OrderType::GoFood),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(hits[0].id, b.id);

        assert!(db.orders().delete(&a.id).await.unwrap());
        assert!(!db.orders().delete(&a.id).await.unwrap());
        let err = db.orders().get_by_id(&a.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }), "got: {err:?}");
    }
}

//! # Shift Ledger Repository
//!
//! Database operations for the per-(cashier, business-day) cash register.
//!
//! ## Shift Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Shift Lifecycle                                    │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── open() → ShiftRecord { balance: None }                         │
//! │         UNIQUE (owner_id, business_day) makes concurrent opens         │
//! │         race-safe: exactly one caller wins                             │
//! │                                                                         │
//! │  2. SELL (repeated)                                                    │
//! │     └── apply_cash_delta() → new balance                               │
//! │         Single UPDATE statement, never read-modify-write, so           │
//! │         concurrent checkouts by the same cashier cannot lose updates   │
//! │                                                                         │
//! │  3. CLOSE (once)                                                       │
//! │     └── close() → ShiftRecord { closed_at: Some(..) }                  │
//! │         Closed records reject further deltas                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use resto_core::{BusinessDay, CashierId, Money, ShiftRecord};

/// Row shape of the `shift_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ShiftRow {
    pub id: String,
    pub owner_id: String,
    pub business_day: String,
    pub opening_cents: i64,
    pub balance_cents: Option<i64>,
    pub note: String,
    pub closing_cents: Option<i64>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftRow {
    pub(crate) fn into_record(self) -> DbResult<ShiftRecord> {
        let business_day: BusinessDay = self
            .business_day
            .parse()
            .map_err(|_| DbError::Internal(format!("malformed business_day: {}", self.business_day)))?;

        Ok(ShiftRecord {
            id: self.id,
            owner: CashierId::new(self.owner_id),
            business_day,
            opening_amount: Money::from_cents(self.opening_cents),
            balance: self.balance_cents.map(Money::from_cents),
            note: self.note,
            closing_amount: self.closing_cents.map(Money::from_cents),
            closed_at: self.closed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, owner_id, business_day, opening_cents, balance_cents, note, \
     closing_cents, closed_at, created_at, updated_at";

/// Repository for shift-ledger database operations.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Opens a shift: creates the one ShiftRecord for (owner, business_day).
    ///
    /// ## Race Safety
    /// No existence pre-check: the INSERT itself hits the UNIQUE
    /// constraint, so two concurrent opens resolve at the storage layer:
    /// one wins, the other gets [`DbError::UniqueViolation`].
    pub async fn open(
        &self,
        owner: &CashierId,
        day: BusinessDay,
        opening: Money,
        note: &str,
    ) -> DbResult<ShiftRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(owner = %owner, day = %day, opening = %opening, "Opening shift");

        sqlx::query(
            r#"
            INSERT INTO shift_records (
                id, owner_id, business_day, opening_cents, balance_cents,
                note, closing_cents, closed_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, NULL, ?5, NULL, NULL, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(owner.as_str())
        .bind(day.to_string())
        .bind(opening.cents())
        .bind(note)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(ShiftRecord {
            id,
            owner: owner.clone(),
            business_day: day,
            opening_amount: opening,
            balance: None,
            note: note.to_string(),
            closing_amount: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetches the shift record for (owner, business_day), if any.
    ///
    /// Absence is a normal result, not an error; callers use it to decide
    /// whether a shift is open.
    pub async fn get_for_day(
        &self,
        owner: &CashierId,
        day: BusinessDay,
    ) -> DbResult<Option<ShiftRecord>> {
        let row: Option<ShiftRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM shift_records WHERE owner_id = ?1 AND business_day = ?2"
        ))
        .bind(owner.as_str())
        .bind(day.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShiftRow::into_record).transpose()
    }

    /// Atomically increments the running balance and returns the new value.
    ///
    /// ## Atomicity
    /// A single UPDATE with `COALESCE(balance_cents, opening_cents)` as the
    /// base: the read and write happen inside one statement at the storage
    /// layer. An application-level read-then-write would lose updates under
    /// concurrent checkouts by the same cashier (two terminals sharing a
    /// login, or rapid sequential sales).
    ///
    /// Only OPEN records match; a missing record yields
    /// [`DbError::ShiftNotOpen`], a closed one [`DbError::ShiftClosed`].
    pub async fn apply_cash_delta(
        &self,
        owner: &CashierId,
        day: BusinessDay,
        delta: Money,
    ) -> DbResult<Money> {
        let now = Utc::now();

        let new_balance: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE shift_records
            SET balance_cents = COALESCE(balance_cents, opening_cents) + ?1,
                updated_at = ?2
            WHERE owner_id = ?3 AND business_day = ?4 AND closed_at IS NULL
            RETURNING balance_cents
            "#,
        )
        .bind(delta.cents())
        .bind(now)
        .bind(owner.as_str())
        .bind(day.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match new_balance {
            Some(balance) => {
                debug!(owner = %owner, day = %day, delta = %delta, balance, "Cash delta applied");
                Ok(Money::from_cents(balance))
            }
            None => Err(self.classify_missing(owner, day).await?),
        }
    }

    /// Closes the shift, recording the counted cash.
    ///
    /// Closing is final: a closed record rejects further deltas and a second
    /// close. The pre-close note is kept when no new note is supplied.
    pub async fn close(
        &self,
        owner: &CashierId,
        day: BusinessDay,
        closing: Option<Money>,
        note: Option<&str>,
    ) -> DbResult<ShiftRecord> {
        let now = Utc::now();

        debug!(owner = %owner, day = %day, "Closing shift");

        let result = sqlx::query(
            r#"
            UPDATE shift_records
            SET closed_at = ?1,
                closing_cents = ?2,
                note = COALESCE(?3, note),
                updated_at = ?1
            WHERE owner_id = ?4 AND business_day = ?5 AND closed_at IS NULL
            "#,
        )
        .bind(now)
        .bind(closing.map(|m| m.cents()))
        .bind(note)
        .bind(owner.as_str())
        .bind(day.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.classify_missing(owner, day).await?);
        }

        self.get_for_day(owner, day).await?.ok_or_else(|| {
            DbError::Internal("shift record vanished after close".to_string())
        })
    }

    /// Distinguishes "no record for this day" from "record already closed"
    /// after a guarded UPDATE matched nothing.
    async fn classify_missing(&self, owner: &CashierId, day: BusinessDay) -> DbResult<DbError> {
        match self.get_for_day(owner, day).await? {
            Some(record) if !record.is_open() => Ok(DbError::ShiftClosed { day }),
            Some(_) => Ok(DbError::Internal(
                "open shift did not accept the update".to_string(),
            )),
            None => Ok(DbError::ShiftNotOpen { day }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Budget and allocation line operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{decimal_column, optional_date_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetCategory};
use crate::store::BudgetStore;

impl Database {
    fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let updated_at: Option<String> = row.get(6)?;
        Ok(Budget {
            id: row.get(0)?,
            income: decimal_column(row, 1)?,
            needs: decimal_column(row, 2)?,
            wants: decimal_column(row, 3)?,
            start_date: optional_date_column(row, 4)?,
            end_date: optional_date_column(row, 5)?,
            updated_at: updated_at.as_deref().map(parse_datetime),
        })
    }

    fn row_to_budget_category(row: &rusqlite::Row) -> rusqlite::Result<BudgetCategory> {
        let bucket_str: String = row.get(2)?;
        let updated_at: Option<String> = row.get(5)?;
        Ok(BudgetCategory {
            id: row.get(0)?,
            budget_id: row.get(1)?,
            bucket: bucket_str.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
            })?,
            category: row.get(3)?,
            amount: decimal_column(row, 4)?,
            updated_at: updated_at.as_deref().map(parse_datetime),
        })
    }

    /// Get a budget row by ID
    pub fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                "SELECT id, income, needs, wants, start_date, end_date, updated_at
                 FROM budget WHERE id = ?",
                params![id],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }
}

impl BudgetStore for Database {
    fn active_budget(&self) -> Result<Option<Budget>> {
        let conn = self.conn()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM budget", [], |row| row.get(0))?;
        if count > 1 {
            warn!(count, "Multiple budget rows found, using the oldest");
        }

        let budget = conn
            .query_row(
                "SELECT id, income, needs, wants, start_date, end_date, updated_at
                 FROM budget ORDER BY id ASC LIMIT 1",
                [],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    fn create_budget(
        &self,
        income: Decimal,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Budget> {
        let id = {
            let conn = self.conn()?;
            conn.execute(
                "INSERT INTO budget (income, start_date, end_date) VALUES (?, ?, ?)",
                params![
                    income.normalize().to_string(),
                    start_date.map(|d| d.to_string()),
                    end_date.map(|d| d.to_string()),
                ],
            )?;
            conn.last_insert_rowid()
        };

        self.get_budget(id)?
            .ok_or_else(|| Error::NotFound(format!("budget {}", id)))
    }

    fn update_budget(&self, budget: &Budget) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE budget
            SET income = ?, needs = ?, wants = ?, start_date = ?, end_date = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                budget.income.normalize().to_string(),
                budget.needs.normalize().to_string(),
                budget.wants.normalize().to_string(),
                budget.start_date.map(|d| d.to_string()),
                budget.end_date.map(|d| d.to_string()),
                budget.id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("budget {}", budget.id)));
        }
        debug!(budget_id = budget.id, "Updated budget");
        Ok(())
    }

    fn list_budget_categories(&self, budget_id: i64) -> Result<Vec<BudgetCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, budget_id, type, category, amount, updated_at
            FROM budget_categories
            WHERE budget_id = ?
            ORDER BY id
            "#,
        )?;

        let categories = stmt
            .query_map(params![budget_id], Self::row_to_budget_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn upsert_budget_category(&self, category: &BudgetCategory) -> Result<i64> {
        let conn = self.conn()?;
        let amount = category.amount.normalize().to_string();

        if category.id == 0 {
            // A line with the same name may already exist if an earlier save
            // was interrupted; the unique key folds it into an update.
            conn.execute(
                r#"
                INSERT INTO budget_categories (budget_id, type, category, amount)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (budget_id, type, category)
                DO UPDATE SET amount = excluded.amount, updated_at = CURRENT_TIMESTAMP
                "#,
                params![
                    category.budget_id,
                    category.bucket.as_str(),
                    category.category,
                    amount,
                ],
            )?;
            let id: i64 = conn.query_row(
                "SELECT id FROM budget_categories WHERE budget_id = ? AND type = ? AND category = ?",
                params![category.budget_id, category.bucket.as_str(), category.category],
                |row| row.get(0),
            )?;
            return Ok(id);
        }

        let updated = conn.execute(
            r#"
            UPDATE budget_categories
            SET amount = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![amount, category.id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("budget category {}", category.id)));
        }
        Ok(category.id)
    }
}

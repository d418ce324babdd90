//! Transaction operations

use rusqlite::params;
use tracing::debug;

use super::transaction_filter::TransactionFilter;
use super::{date_column, decimal_column, parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewTransaction, Transaction};
use crate::store::{TransactionQuery, TransactionStore};

impl Database {
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let type_str: String = row.get(3)?;
        let created_at_str: String = row.get(6)?;
        Ok(Transaction {
            id: row.get(0)?,
            name: row.get(1)?,
            amount: decimal_column(row, 2)?,
            transaction_type: type_str.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
            })?,
            category: row.get(4)?,
            date: date_column(row, 5)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        use rusqlite::OptionalExtension;

        let conn = self.conn()?;
        let tx = conn
            .query_row(
                "SELECT t.id, t.name, t.amount, t.type, t.category, t.date, t.created_at
                 FROM transactions t WHERE t.id = ?",
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// Count transactions matching the query's date bounds
    pub fn count_transactions(&self, query: &TransactionQuery) -> Result<i64> {
        let conn = self.conn()?;
        let filter = TransactionFilter::from(query).build();
        let count: i64 = conn.query_row(
            &filter.build_count_query(),
            filter.filter_params_refs().as_slice(),
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl TransactionStore for Database {
    fn list_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let filter = TransactionFilter::from(query).build();

        let sql = format!(
            r#"
            SELECT t.id, t.name, t.amount, t.type, t.category, t.date, t.created_at
            FROM transactions t
            {}
            {}
            {}
            "#,
            filter.where_clause, filter.order_clause, filter.limit_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(filter.params_refs().as_slice(), Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(count = transactions.len(), ?query, "Listed transactions");
        Ok(transactions)
    }

    fn insert_transaction(&self, new: &NewTransaction) -> Result<Transaction> {
        new.validate()?;

        let id = {
            let conn = self.conn()?;
            conn.execute(
                r#"
                INSERT INTO transactions (name, amount, type, category, date)
                VALUES (?, ?, ?, ?, ?)
                "#,
                params![
                    new.name.trim(),
                    new.amount.normalize().to_string(),
                    new.transaction_type.as_str(),
                    new.category,
                    new.date.to_string(),
                ],
            )?;
            conn.last_insert_rowid()
        };

        debug!(id, amount = %new.amount, kind = %new.transaction_type, "Inserted transaction");

        self.get_transaction(id)?
            .ok_or_else(|| crate::error::Error::NotFound(format!("transaction {}", id)))
    }
}

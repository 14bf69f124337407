#![forbid(unsafe_code)]

use super::requests::{BudgetCreateRequest, BudgetUpdateRequest, ListRequest};
use super::support::{next_position, now_rfc3339, visibility_clause};
use super::types::{Audit, BudgetRecord};
use super::{SqliteStore, StoreError};
use rusqlite::{OptionalExtension, Row, params};
use tally_core::ids::RecordId;
use tally_core::model::RecordKind;

const COLUMNS: &str = "id, name, amount_minor, currency, position, \
     created_by, create_time, updated_by, update_time, deleted_by, delete_time";

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<BudgetRecord> {
    Ok(BudgetRecord {
        id: RecordId::new(row.get(0)?),
        name: row.get(1)?,
        amount_minor: row.get(2)?,
        currency: row.get(3)?,
        position: row.get(4)?,
        audit: Audit::from_row(row, 5)?,
    })
}

impl SqliteStore {
    pub fn budget_create(
        &mut self,
        request: BudgetCreateRequest,
    ) -> Result<BudgetRecord, StoreError> {
        let BudgetCreateRequest {
            name,
            amount_minor,
            currency,
            actor,
        } = request;
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput("budget name must not be empty"));
        }
        if amount_minor < 0 {
            return Err(StoreError::InvalidInput("budget amount must not be negative"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let position = next_position(&tx, RecordKind::Budget)?;
        tx.execute(
            r#"
            INSERT INTO budgets(name, amount_minor, currency, position, created_by, create_time)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![name, amount_minor, currency, position, actor.as_str(), now],
        )?;
        let id = tx.last_insert_rowid();
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM budgets WHERE id = ?1"),
            params![id],
            budget_from_row,
        )?;
        tx.commit()?;
        Ok(record)
    }

    pub fn budget_get(&self, id: RecordId) -> Result<Option<BudgetRecord>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM budgets WHERE id = ?1"),
                params![id.as_i64()],
                budget_from_row,
            )
            .optional()?)
    }

    pub fn budget_list(&self, request: ListRequest) -> Result<Vec<BudgetRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM budgets {} ORDER BY position ASC, id ASC LIMIT ?1 OFFSET ?2",
            visibility_clause(request.visibility)
        ))?;
        let rows = stmt.query_map(
            params![request.limit.map_or(-1i64, |limit| limit as i64), request.offset as i64],
            budget_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn budget_update(
        &mut self,
        request: BudgetUpdateRequest,
    ) -> Result<Option<BudgetRecord>, StoreError> {
        let BudgetUpdateRequest {
            id,
            name,
            amount_minor,
            currency,
            actor,
        } = request;
        if name.is_none() && amount_minor.is_none() && currency.is_none() {
            return Err(StoreError::InvalidInput("no fields to edit"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let current = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM budgets WHERE id = ?1 AND delete_time IS NULL"),
                params![id.as_i64()],
                budget_from_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };

        let new_name = name.unwrap_or(current.name);
        let new_amount_minor = amount_minor.unwrap_or(current.amount_minor);
        let new_currency = currency.unwrap_or(current.currency);
        if new_name.trim().is_empty() {
            return Err(StoreError::InvalidInput("budget name must not be empty"));
        }
        if new_amount_minor < 0 {
            return Err(StoreError::InvalidInput("budget amount must not be negative"));
        }

        tx.execute(
            r#"
            UPDATE budgets
            SET name = ?2, amount_minor = ?3, currency = ?4, update_time = ?5, updated_by = ?6
            WHERE id = ?1
            "#,
            params![
                id.as_i64(),
                new_name,
                new_amount_minor,
                new_currency,
                now,
                actor.as_str()
            ],
        )?;
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM budgets WHERE id = ?1"),
            params![id.as_i64()],
            budget_from_row,
        )?;
        tx.commit()?;
        Ok(Some(record))
    }
}

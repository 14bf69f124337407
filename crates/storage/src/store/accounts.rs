#![forbid(unsafe_code)]

use super::requests::{AccountCreateRequest, AccountUpdateRequest, ListRequest};
use super::support::{next_position, now_rfc3339, visibility_clause};
use super::types::{AccountRecord, Audit};
use super::{SqliteStore, StoreError};
use rusqlite::{OptionalExtension, Row, params};
use tally_core::ids::RecordId;
use tally_core::model::RecordKind;

const COLUMNS: &str = "id, name, currency, opening_minor, position, \
     created_by, create_time, updated_by, update_time, deleted_by, delete_time";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<AccountRecord> {
    Ok(AccountRecord {
        id: RecordId::new(row.get(0)?),
        name: row.get(1)?,
        currency: row.get(2)?,
        opening_minor: row.get(3)?,
        position: row.get(4)?,
        audit: Audit::from_row(row, 5)?,
    })
}

impl SqliteStore {
    pub fn account_create(
        &mut self,
        request: AccountCreateRequest,
    ) -> Result<AccountRecord, StoreError> {
        let AccountCreateRequest {
            name,
            currency,
            opening_minor,
            actor,
        } = request;
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput("account name must not be empty"));
        }
        if currency.trim().is_empty() {
            return Err(StoreError::InvalidInput("account currency must not be empty"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let position = next_position(&tx, RecordKind::Account)?;
        tx.execute(
            r#"
            INSERT INTO accounts(name, currency, opening_minor, position, created_by, create_time)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![name, currency, opening_minor, position, actor.as_str(), now],
        )?;
        let id = tx.last_insert_rowid();
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM accounts WHERE id = ?1"),
            params![id],
            account_from_row,
        )?;
        tx.commit()?;
        Ok(record)
    }

    pub fn account_get(&self, id: RecordId) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM accounts WHERE id = ?1"),
                params![id.as_i64()],
                account_from_row,
            )
            .optional()?)
    }

    pub fn account_list(&self, request: ListRequest) -> Result<Vec<AccountRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM accounts {} ORDER BY position ASC, id ASC LIMIT ?1 OFFSET ?2",
            visibility_clause(request.visibility)
        ))?;
        let rows = stmt.query_map(
            params![request.limit.map_or(-1i64, |limit| limit as i64), request.offset as i64],
            account_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn account_update(
        &mut self,
        request: AccountUpdateRequest,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let AccountUpdateRequest {
            id,
            name,
            currency,
            opening_minor,
            actor,
        } = request;
        if name.is_none() && currency.is_none() && opening_minor.is_none() {
            return Err(StoreError::InvalidInput("no fields to edit"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let current = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM accounts WHERE id = ?1 AND delete_time IS NULL"),
                params![id.as_i64()],
                account_from_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };

        let new_name = name.unwrap_or(current.name);
        let new_currency = currency.unwrap_or(current.currency);
        let new_opening_minor = opening_minor.unwrap_or(current.opening_minor);
        if new_name.trim().is_empty() {
            return Err(StoreError::InvalidInput("account name must not be empty"));
        }

        tx.execute(
            r#"
            UPDATE accounts
            SET name = ?2, currency = ?3, opening_minor = ?4, update_time = ?5, updated_by = ?6
            WHERE id = ?1
            "#,
            params![
                id.as_i64(),
                new_name,
                new_currency,
                new_opening_minor,
                now,
                actor.as_str()
            ],
        )?;
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM accounts WHERE id = ?1"),
            params![id.as_i64()],
            account_from_row,
        )?;
        tx.commit()?;
        Ok(Some(record))
    }
}

#![forbid(unsafe_code)]

use super::requests::{CurrencyCreateRequest, CurrencyUpdateRequest, ListRequest};
use super::support::{next_position, now_rfc3339, visibility_clause};
use super::types::{Audit, CurrencyRecord};
use super::{SqliteStore, StoreError};
use rusqlite::{OptionalExtension, Row, params};
use tally_core::ids::RecordId;
use tally_core::model::RecordKind;

const COLUMNS: &str = "id, code, symbol, decimal_places, position, \
     created_by, create_time, updated_by, update_time, deleted_by, delete_time";

fn currency_from_row(row: &Row<'_>) -> rusqlite::Result<CurrencyRecord> {
    Ok(CurrencyRecord {
        id: RecordId::new(row.get(0)?),
        code: row.get(1)?,
        symbol: row.get(2)?,
        decimal_places: row.get(3)?,
        position: row.get(4)?,
        audit: Audit::from_row(row, 5)?,
    })
}

impl SqliteStore {
    pub fn currency_create(
        &mut self,
        request: CurrencyCreateRequest,
    ) -> Result<CurrencyRecord, StoreError> {
        let CurrencyCreateRequest {
            code,
            symbol,
            decimal_places,
            actor,
        } = request;
        if code.trim().is_empty() {
            return Err(StoreError::InvalidInput("currency code must not be empty"));
        }
        if !(0..=8).contains(&decimal_places) {
            return Err(StoreError::InvalidInput("decimal_places must be within 0..=8"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let position = next_position(&tx, RecordKind::Currency)?;
        tx.execute(
            r#"
            INSERT INTO currencies(code, symbol, decimal_places, position, created_by, create_time)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![code, symbol, decimal_places, position, actor.as_str(), now],
        )?;
        let id = tx.last_insert_rowid();
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM currencies WHERE id = ?1"),
            params![id],
            currency_from_row,
        )?;
        tx.commit()?;
        Ok(record)
    }

    pub fn currency_get(&self, id: RecordId) -> Result<Option<CurrencyRecord>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM currencies WHERE id = ?1"),
                params![id.as_i64()],
                currency_from_row,
            )
            .optional()?)
    }

    pub fn currency_list(&self, request: ListRequest) -> Result<Vec<CurrencyRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM currencies {} ORDER BY position ASC, id ASC LIMIT ?1 OFFSET ?2",
            visibility_clause(request.visibility)
        ))?;
        let rows = stmt.query_map(
            params![request.limit.map_or(-1i64, |limit| limit as i64), request.offset as i64],
            currency_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn currency_update(
        &mut self,
        request: CurrencyUpdateRequest,
    ) -> Result<Option<CurrencyRecord>, StoreError> {
        let CurrencyUpdateRequest {
            id,
            code,
            symbol,
            decimal_places,
            actor,
        } = request;
        if code.is_none() && symbol.is_none() && decimal_places.is_none() {
            return Err(StoreError::InvalidInput("no fields to edit"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let current = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM currencies WHERE id = ?1 AND delete_time IS NULL"),
                params![id.as_i64()],
                currency_from_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };

        let new_code = code.unwrap_or(current.code);
        let new_symbol = symbol.unwrap_or(current.symbol);
        let new_decimal_places = decimal_places.unwrap_or(current.decimal_places);
        if new_code.trim().is_empty() {
            return Err(StoreError::InvalidInput("currency code must not be empty"));
        }
        if !(0..=8).contains(&new_decimal_places) {
            return Err(StoreError::InvalidInput("decimal_places must be within 0..=8"));
        }

        tx.execute(
            r#"
            UPDATE currencies
            SET code = ?2, symbol = ?3, decimal_places = ?4, update_time = ?5, updated_by = ?6
            WHERE id = ?1
            "#,
            params![
                id.as_i64(),
                new_code,
                new_symbol,
                new_decimal_places,
                now,
                actor.as_str()
            ],
        )?;
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM currencies WHERE id = ?1"),
            params![id.as_i64()],
            currency_from_row,
        )?;
        tx.commit()?;
        Ok(Some(record))
    }
}

#![forbid(unsafe_code)]

use super::requests::{
    ListRequest, OperationCreateRequest, OperationUpdateRequest, RestoreRequest, SoftDeleteRequest,
};
use super::support::{now_rfc3339, visibility_clause};
use super::types::{Audit, OperationRecord};
use super::{SqliteStore, StoreError};
use rusqlite::{OptionalExtension, Row, params};
use tally_core::ids::RecordId;

const COLUMNS: &str = "id, account_id, category_id, amount_minor, note, occurred_on, \
     created_by, create_time, updated_by, update_time, deleted_by, delete_time";

fn operation_from_row(row: &Row<'_>) -> rusqlite::Result<OperationRecord> {
    Ok(OperationRecord {
        id: RecordId::new(row.get(0)?),
        account_id: RecordId::new(row.get(1)?),
        category_id: row.get::<_, Option<i64>>(2)?.map(RecordId::new),
        amount_minor: row.get(3)?,
        note: row.get(4)?,
        occurred_on: row.get(5)?,
        audit: Audit::from_row(row, 6)?,
    })
}

impl SqliteStore {
    pub fn operation_create(
        &mut self,
        request: OperationCreateRequest,
    ) -> Result<OperationRecord, StoreError> {
        let OperationCreateRequest {
            account_id,
            category_id,
            amount_minor,
            note,
            occurred_on,
            actor,
        } = request;
        if occurred_on.trim().is_empty() {
            return Err(StoreError::InvalidInput("occurred_on must not be empty"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO operations(account_id, category_id, amount_minor, note, occurred_on, created_by, create_time)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                account_id.as_i64(),
                category_id.map(RecordId::as_i64),
                amount_minor,
                note,
                occurred_on,
                actor.as_str(),
                now
            ],
        )?;
        let id = tx.last_insert_rowid();
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM operations WHERE id = ?1"),
            params![id],
            operation_from_row,
        )?;
        tx.commit()?;
        Ok(record)
    }

    pub fn operation_get(&self, id: RecordId) -> Result<Option<OperationRecord>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM operations WHERE id = ?1"),
                params![id.as_i64()],
                operation_from_row,
            )
            .optional()?)
    }

    /// Ledger entries are listed newest first; they carry no display
    /// position.
    pub fn operation_list(&self, request: ListRequest) -> Result<Vec<OperationRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM operations {} ORDER BY occurred_on DESC, id DESC LIMIT ?1 OFFSET ?2",
            visibility_clause(request.visibility)
        ))?;
        let rows = stmt.query_map(
            params![request.limit.map_or(-1i64, |limit| limit as i64), request.offset as i64],
            operation_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn operation_update(
        &mut self,
        request: OperationUpdateRequest,
    ) -> Result<Option<OperationRecord>, StoreError> {
        let OperationUpdateRequest {
            id,
            account_id,
            category_id,
            amount_minor,
            note,
            occurred_on,
            actor,
        } = request;
        if account_id.is_none()
            && category_id.is_none()
            && amount_minor.is_none()
            && note.is_none()
            && occurred_on.is_none()
        {
            return Err(StoreError::InvalidInput("no fields to edit"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let current = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM operations WHERE id = ?1 AND delete_time IS NULL"),
                params![id.as_i64()],
                operation_from_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };

        let new_account_id = account_id.unwrap_or(current.account_id);
        let new_category_id = category_id.unwrap_or(current.category_id);
        let new_amount_minor = amount_minor.unwrap_or(current.amount_minor);
        let new_note = note.unwrap_or(current.note);
        let new_occurred_on = occurred_on.unwrap_or(current.occurred_on);
        if new_occurred_on.trim().is_empty() {
            return Err(StoreError::InvalidInput("occurred_on must not be empty"));
        }

        tx.execute(
            r#"
            UPDATE operations
            SET account_id = ?2, category_id = ?3, amount_minor = ?4, note = ?5,
                occurred_on = ?6, update_time = ?7, updated_by = ?8
            WHERE id = ?1
            "#,
            params![
                id.as_i64(),
                new_account_id.as_i64(),
                new_category_id.map(RecordId::as_i64),
                new_amount_minor,
                new_note,
                new_occurred_on,
                now,
                actor.as_str()
            ],
        )?;
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM operations WHERE id = ?1"),
            params![id.as_i64()],
            operation_from_row,
        )?;
        tx.commit()?;
        Ok(Some(record))
    }

    /// Tombstones a ledger entry. No position bookkeeping is involved.
    pub fn operation_soft_delete(&mut self, request: SoftDeleteRequest) -> Result<bool, StoreError> {
        let SoftDeleteRequest { id, actor } = request;
        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE operations SET delete_time = ?2, deleted_by = ?3 \
             WHERE id = ?1 AND delete_time IS NULL",
            params![id.as_i64(), now, actor.as_str()],
        )?;
        tx.commit()?;

        if changed > 0 {
            tracing::debug!(id = id.as_i64(), "operation tombstoned");
        }
        Ok(changed > 0)
    }

    pub fn operation_restore(&mut self, request: RestoreRequest) -> Result<bool, StoreError> {
        let RestoreRequest { id, actor } = request;
        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE operations SET delete_time = NULL, deleted_by = NULL, \
             update_time = ?2, updated_by = ?3 \
             WHERE id = ?1 AND delete_time IS NOT NULL",
            params![id.as_i64(), now, actor.as_str()],
        )?;
        tx.commit()?;

        if changed > 0 {
            tracing::debug!(id = id.as_i64(), "operation restored");
        }
        Ok(changed > 0)
    }
}

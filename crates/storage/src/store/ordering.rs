#![forbid(unsafe_code)]

use super::support::{
    close_gap_tx, gap_detected, next_position, normalize_tx, now_rfc3339, order_state,
    set_position_tx, shift_for_move_tx,
};
use super::types::{OrderReport, OrderRow};
use super::{MoveRecordRequest, RestoreRequest, SoftDeleteRequest, SqliteStore, StoreError};
use rusqlite::params;
use tally_core::ids::RecordId;
use tally_core::model::RecordKind;
use tally_core::order::is_dense;

impl SqliteStore {
    /// Moves a live record to `new_position`, shifting the rows in between
    /// by one so the order stays dense. Positions past the current maximum
    /// are legal; the record simply becomes the new maximum. Returns false
    /// when the id is unknown or tombstoned.
    pub fn move_record(
        &mut self,
        kind: RecordKind,
        request: MoveRecordRequest,
    ) -> Result<bool, StoreError> {
        let MoveRecordRequest {
            id,
            new_position,
            actor,
        } = request;
        if new_position < 1 {
            return Err(StoreError::InvalidInput("new_position must be >= 1"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let Some(state) = order_state(&tx, kind, id)? else {
            return Ok(false);
        };
        if !state.live {
            return Ok(false);
        }

        if state.position != new_position {
            shift_for_move_tx(&tx, kind, id, state.position, new_position)?;
            set_position_tx(&tx, kind, id, new_position, &now, &actor)?;
        }
        tx.commit()?;

        tracing::debug!(
            table = kind.table(),
            id = id.as_i64(),
            from = state.position,
            to = new_position,
            "record moved"
        );
        Ok(true)
    }

    /// Tombstones a live record: stamps `delete_time`/`deleted_by`, parks
    /// the position at the sentinel 0 and closes the gap it left. Returns
    /// false when the id is unknown or already tombstoned.
    pub fn soft_delete(
        &mut self,
        kind: RecordKind,
        request: SoftDeleteRequest,
    ) -> Result<bool, StoreError> {
        let SoftDeleteRequest { id, actor } = request;
        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let Some(state) = order_state(&tx, kind, id)? else {
            return Ok(false);
        };
        if !state.live {
            return Ok(false);
        }

        tx.execute(
            &format!(
                "UPDATE {} SET delete_time = ?2, deleted_by = ?3, position = 0 WHERE id = ?1",
                kind.table()
            ),
            params![id.as_i64(), now, actor.as_str()],
        )?;
        close_gap_tx(&tx, kind, state.position)?;
        if gap_detected(&tx, kind)? {
            normalize_tx(&tx, kind)?;
        }
        tx.commit()?;

        tracing::debug!(table = kind.table(), id = id.as_i64(), "record tombstoned");
        Ok(true)
    }

    /// Brings a tombstoned record back at the end of the live order, then
    /// normalizes so positions are dense again. The record does not return
    /// to its old slot. Returns false when the id is unknown or live.
    pub fn restore(&mut self, kind: RecordKind, request: RestoreRequest) -> Result<bool, StoreError> {
        let RestoreRequest { id, actor } = request;
        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let Some(state) = order_state(&tx, kind, id)? else {
            return Ok(false);
        };
        if state.live {
            return Ok(false);
        }

        let new_position = next_position(&tx, kind)?;
        tx.execute(
            &format!(
                "UPDATE {} SET delete_time = NULL, deleted_by = NULL, position = ?2, \
                 update_time = ?3, updated_by = ?4 WHERE id = ?1",
                kind.table()
            ),
            params![id.as_i64(), new_position, now, actor.as_str()],
        )?;
        normalize_tx(&tx, kind)?;
        tx.commit()?;

        tracing::debug!(table = kind.table(), id = id.as_i64(), "record restored");
        Ok(true)
    }

    /// Recomputes live positions as a dense 1..N run. Idempotent; returns
    /// the number of rows that had to be rewritten.
    pub fn normalize(&mut self, kind: RecordKind) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let rewritten = normalize_tx(&tx, kind)?;
        tx.commit()?;

        if rewritten > 0 {
            tracing::debug!(table = kind.table(), rewritten, "positions normalized");
        }
        Ok(rewritten)
    }

    /// The gap heuristic: true when the live maximum position exceeds the
    /// live row count. A true result proves drift; a false one does not
    /// rule out duplicate positions.
    pub fn needs_normalize(&self, kind: RecordKind) -> Result<bool, StoreError> {
        gap_detected(&self.conn, kind)
    }

    /// Physically removes tombstoned rows. Live rows and their positions
    /// are untouched.
    pub fn purge_deleted(&mut self, kind: RecordKind) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            &format!("DELETE FROM {} WHERE delete_time IS NOT NULL", kind.table()),
            [],
        )?;
        tx.commit()?;

        if removed > 0 {
            tracing::debug!(table = kind.table(), removed, "tombstoned rows purged");
        }
        Ok(removed)
    }

    /// Snapshot of the live order plus a density verdict.
    pub fn order_report(&self, kind: RecordKind) -> Result<OrderReport, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, position FROM {} WHERE delete_time IS NULL \
             ORDER BY position ASC, id ASC",
            kind.table()
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(OrderRow {
                id: RecordId::new(row.get(0)?),
                position: row.get(1)?,
            })
        })?;
        let rows = rows.collect::<Result<Vec<_>, _>>()?;
        let dense = is_dense(&rows);
        Ok(OrderReport { rows, dense })
    }
}

#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use tally_core::ids::{ActorId, RecordId};
use tally_core::model::RecordKind;

pub(in crate::store) struct OrderState {
    pub position: i64,
    pub live: bool,
}

/// Current position and liveness of one row, no tombstone filter applied.
pub(in crate::store) fn order_state(
    conn: &Connection,
    kind: RecordKind,
    id: RecordId,
) -> Result<Option<OrderState>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT position, delete_time IS NULL FROM {} WHERE id = ?1",
                kind.table()
            ),
            params![id.as_i64()],
            |row| {
                Ok(OrderState {
                    position: row.get(0)?,
                    live: row.get(1)?,
                })
            },
        )
        .optional()?)
}

/// Position for a newly created or restored record: one past the maximum
/// over ALL rows of the table, live or tombstoned. Stale positions left on
/// tombstoned rows therefore never collide with a fresh one. Returns 1 for
/// an empty table.
pub(in crate::store) fn next_position(
    conn: &Connection,
    kind: RecordKind,
) -> Result<i64, StoreError> {
    let max: i64 = conn.query_row(
        &format!("SELECT COALESCE(MAX(position), 0) FROM {}", kind.table()),
        [],
        |row| row.get(0),
    )?;
    Ok(max + 1)
}

/// The ±1 shifts that keep the order dense when a row moves from
/// `old_position` to `new_position`. Shift ranges span every row of the
/// table regardless of tombstone state; the moved row itself is excluded
/// and written separately by `set_position_tx`.
pub(in crate::store) fn shift_for_move_tx(
    tx: &Transaction<'_>,
    kind: RecordKind,
    id: RecordId,
    old_position: i64,
    new_position: i64,
) -> Result<(), StoreError> {
    if old_position < new_position {
        tx.execute(
            &format!(
                "UPDATE {} SET position = position - 1 \
                 WHERE position > ?1 AND position <= ?2 AND id != ?3",
                kind.table()
            ),
            params![old_position, new_position, id.as_i64()],
        )?;
    } else if old_position > new_position {
        tx.execute(
            &format!(
                "UPDATE {} SET position = position + 1 \
                 WHERE position >= ?1 AND position < ?2 AND id != ?3",
                kind.table()
            ),
            params![new_position, old_position, id.as_i64()],
        )?;
    }
    Ok(())
}

pub(in crate::store) fn set_position_tx(
    tx: &Transaction<'_>,
    kind: RecordKind,
    id: RecordId,
    position: i64,
    now: &str,
    actor: &ActorId,
) -> Result<(), StoreError> {
    tx.execute(
        &format!(
            "UPDATE {} SET position = ?2, update_time = ?3, updated_by = ?4 WHERE id = ?1",
            kind.table()
        ),
        params![id.as_i64(), position, now, actor.as_str()],
    )?;
    Ok(())
}

/// Closes the hole a tombstoned row left behind: every row above the old
/// position slides down by one, again across all rows of the table.
pub(in crate::store) fn close_gap_tx(
    tx: &Transaction<'_>,
    kind: RecordKind,
    position: i64,
) -> Result<(), StoreError> {
    tx.execute(
        &format!(
            "UPDATE {} SET position = position - 1 WHERE position > ?1",
            kind.table()
        ),
        params![position],
    )?;
    Ok(())
}

/// Reassigns live positions as a dense 1..N run ordered by current
/// position, ties broken by id. Rows already in place are not rewritten,
/// so a second run changes nothing. Returns the number of rewritten rows.
pub(in crate::store) fn normalize_tx(
    tx: &Transaction<'_>,
    kind: RecordKind,
) -> Result<usize, StoreError> {
    let live: Vec<(i64, i64)> = {
        let mut stmt = tx.prepare(&format!(
            "SELECT id, position FROM {} WHERE delete_time IS NULL \
             ORDER BY position ASC, id ASC",
            kind.table()
        ))?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let mut rewritten = 0usize;
    for (index, (id, position)) in live.iter().enumerate() {
        let target = index as i64 + 1;
        if *position == target {
            continue;
        }
        tx.execute(
            &format!("UPDATE {} SET position = ?2 WHERE id = ?1", kind.table()),
            params![id, target],
        )?;
        rewritten += 1;
    }
    Ok(rewritten)
}

/// Cheap drift check: a live maximum above the live count proves a gap.
/// Duplicate positions at or below the count slip through, so this is a
/// fast-path skip, not a correctness gate; callers that need certainty
/// normalize unconditionally.
pub(in crate::store) fn gap_detected(
    conn: &Connection,
    kind: RecordKind,
) -> Result<bool, StoreError> {
    let (total, max_position): (i64, i64) = conn.query_row(
        &format!(
            "SELECT COUNT(*), COALESCE(MAX(position), 0) FROM {} WHERE delete_time IS NULL",
            kind.table()
        ),
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(max_position > total)
}

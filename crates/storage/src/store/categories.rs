#![forbid(unsafe_code)]

use super::requests::{CategoryCreateRequest, CategoryUpdateRequest, ListRequest};
use super::support::{next_position, now_rfc3339, visibility_clause};
use super::types::{Audit, CategoryRecord};
use super::{SqliteStore, StoreError};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};
use tally_core::ids::RecordId;
use tally_core::model::{Flow, RecordKind};

const COLUMNS: &str = "id, name, flow, position, \
     created_by, create_time, updated_by, update_time, deleted_by, delete_time";

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<CategoryRecord> {
    let flow_text: String = row.get(2)?;
    let flow = Flow::parse(&flow_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown flow: {flow_text}").into(),
        )
    })?;
    Ok(CategoryRecord {
        id: RecordId::new(row.get(0)?),
        name: row.get(1)?,
        flow,
        position: row.get(3)?,
        audit: Audit::from_row(row, 4)?,
    })
}

impl SqliteStore {
    pub fn category_create(
        &mut self,
        request: CategoryCreateRequest,
    ) -> Result<CategoryRecord, StoreError> {
        let CategoryCreateRequest { name, flow, actor } = request;
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput("category name must not be empty"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let position = next_position(&tx, RecordKind::Category)?;
        tx.execute(
            r#"
            INSERT INTO categories(name, flow, position, created_by, create_time)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![name, flow.as_str(), position, actor.as_str(), now],
        )?;
        let id = tx.last_insert_rowid();
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM categories WHERE id = ?1"),
            params![id],
            category_from_row,
        )?;
        tx.commit()?;
        Ok(record)
    }

    pub fn category_get(&self, id: RecordId) -> Result<Option<CategoryRecord>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM categories WHERE id = ?1"),
                params![id.as_i64()],
                category_from_row,
            )
            .optional()?)
    }

    pub fn category_list(&self, request: ListRequest) -> Result<Vec<CategoryRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM categories {} ORDER BY position ASC, id ASC LIMIT ?1 OFFSET ?2",
            visibility_clause(request.visibility)
        ))?;
        let rows = stmt.query_map(
            params![request.limit.map_or(-1i64, |limit| limit as i64), request.offset as i64],
            category_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn category_update(
        &mut self,
        request: CategoryUpdateRequest,
    ) -> Result<Option<CategoryRecord>, StoreError> {
        let CategoryUpdateRequest {
            id,
            name,
            flow,
            actor,
        } = request;
        if name.is_none() && flow.is_none() {
            return Err(StoreError::InvalidInput("no fields to edit"));
        }

        let now = now_rfc3339();
        let tx = self.conn.transaction()?;
        let current = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM categories WHERE id = ?1 AND delete_time IS NULL"),
                params![id.as_i64()],
                category_from_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };

        let new_name = name.unwrap_or(current.name);
        let new_flow = flow.unwrap_or(current.flow);
        if new_name.trim().is_empty() {
            return Err(StoreError::InvalidInput("category name must not be empty"));
        }

        tx.execute(
            r#"
            UPDATE categories
            SET name = ?2, flow = ?3, update_time = ?4, updated_by = ?5
            WHERE id = ?1
            "#,
            params![id.as_i64(), new_name, new_flow.as_str(), now, actor.as_str()],
        )?;
        let record = tx.query_row(
            &format!("SELECT {COLUMNS} FROM categories WHERE id = ?1"),
            params![id.as_i64()],
            category_from_row,
        )?;
        tx.commit()?;
        Ok(Some(record))
    }
}

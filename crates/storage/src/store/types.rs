#![forbid(unsafe_code)]

use rusqlite::Row;
use tally_core::ids::RecordId;
use tally_core::model::Flow;
use tally_core::order::Ordered;

/// Attribution and lifecycle timestamps shared by every table.
/// `delete_time` unset means the record is live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Audit {
    pub created_by: Option<String>,
    pub create_time: Option<String>,
    pub updated_by: Option<String>,
    pub update_time: Option<String>,
    pub deleted_by: Option<String>,
    pub delete_time: Option<String>,
}

impl Audit {
    pub fn is_live(&self) -> bool {
        self.delete_time.is_none()
    }

    pub(in crate::store) fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            created_by: row.get(offset)?,
            create_time: row.get(offset + 1)?,
            updated_by: row.get(offset + 2)?,
            update_time: row.get(offset + 3)?,
            deleted_by: row.get(offset + 4)?,
            delete_time: row.get(offset + 5)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: RecordId,
    pub name: String,
    pub currency: String,
    pub opening_minor: i64,
    pub position: i64,
    pub audit: Audit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: RecordId,
    pub name: String,
    pub flow: Flow,
    pub position: i64,
    pub audit: Audit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyRecord {
    pub id: RecordId,
    pub code: String,
    pub symbol: Option<String>,
    pub decimal_places: i64,
    pub position: i64,
    pub audit: Audit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetRecord {
    pub id: RecordId,
    pub name: String,
    pub amount_minor: i64,
    pub currency: String,
    pub position: i64,
    pub audit: Audit,
}

/// Ledger entry. Operations share the soft-delete lifecycle but carry no
/// display position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationRecord {
    pub id: RecordId,
    pub account_id: RecordId,
    pub category_id: Option<RecordId>,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_on: String,
    pub audit: Audit,
}

macro_rules! impl_ordered {
    ($record:ty) => {
        impl Ordered for $record {
            fn record_id(&self) -> RecordId {
                self.id
            }

            fn position(&self) -> i64 {
                self.position
            }
        }
    };
}

impl_ordered!(AccountRecord);
impl_ordered!(CategoryRecord);
impl_ordered!(CurrencyRecord);
impl_ordered!(BudgetRecord);

/// One live row in the diagnostic snapshot of a table's order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderRow {
    pub id: RecordId,
    pub position: i64,
}

impl_ordered!(OrderRow);

/// Live rows in display order plus whether they satisfy the dense 1..N
/// target. Tests and maintenance callers read this; the engine never acts
/// on it at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderReport {
    pub rows: Vec<OrderRow>,
    pub dense: bool,
}

#![forbid(unsafe_code)]

use tally_core::ids::{ActorId, RecordId};
use tally_core::model::{Flow, Visibility};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRequest {
    pub visibility: Visibility,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            visibility: Visibility::Live,
            limit: None,
            offset: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecordRequest {
    pub id: RecordId,
    pub new_position: i64,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoftDeleteRequest {
    pub id: RecordId,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoreRequest {
    pub id: RecordId,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountCreateRequest {
    pub name: String,
    pub currency: String,
    pub opening_minor: i64,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountUpdateRequest {
    pub id: RecordId,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub opening_minor: Option<i64>,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryCreateRequest {
    pub name: String,
    pub flow: Flow,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryUpdateRequest {
    pub id: RecordId,
    pub name: Option<String>,
    pub flow: Option<Flow>,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyCreateRequest {
    pub code: String,
    pub symbol: Option<String>,
    pub decimal_places: i64,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyUpdateRequest {
    pub id: RecordId,
    pub code: Option<String>,
    pub symbol: Option<Option<String>>,
    pub decimal_places: Option<i64>,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetCreateRequest {
    pub name: String,
    pub amount_minor: i64,
    pub currency: String,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetUpdateRequest {
    pub id: RecordId,
    pub name: Option<String>,
    pub amount_minor: Option<i64>,
    pub currency: Option<String>,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationCreateRequest {
    pub account_id: RecordId,
    pub category_id: Option<RecordId>,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_on: String,
    pub actor: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationUpdateRequest {
    pub id: RecordId,
    pub account_id: Option<RecordId>,
    pub category_id: Option<Option<RecordId>>,
    pub amount_minor: Option<i64>,
    pub note: Option<Option<String>>,
    pub occurred_on: Option<String>,
    pub actor: ActorId,
}

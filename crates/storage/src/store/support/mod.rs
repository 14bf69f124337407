#![forbid(unsafe_code)]

mod filter;
mod order_tx;
mod schema;
mod time;

pub(super) use filter::visibility_clause;
pub(super) use order_tx::*;
pub(super) use schema::install_schema;
pub(super) use time::now_rfc3339;

#![forbid(unsafe_code)]

mod core;
mod indexes;
mod ledger;
mod pragmas;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(pragmas::SQL);
    sql.push_str(core::SQL);
    sql.push_str(ledger::SQL);
    sql.push_str(indexes::SQL);
    sql
}

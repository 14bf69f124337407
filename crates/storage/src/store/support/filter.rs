#![forbid(unsafe_code)]

use tally_core::model::Visibility;

/// WHERE fragment selecting rows by tombstone state. Every list path goes
/// through this; point lookups by id deliberately do not, so a tombstoned
/// record stays individually retrievable.
pub(in crate::store) fn visibility_clause(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Live => "WHERE delete_time IS NULL",
        Visibility::Deleted => "WHERE delete_time IS NOT NULL",
        Visibility::All => "",
    }
}

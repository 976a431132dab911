pub mod follow;
pub mod post;
pub mod user;

use crate::outcome::Outcome;
use sea_orm::DbErr;

/// Server-set timestamp used for created_at/updated_at columns.
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Maps a database error to an outcome. Uniqueness races are enforced by the
/// store's constraints at write time; a violation surfaces here and becomes a
/// DuplicatedEntry instead of a raw fault. Anything unrecognized degrades to
/// a generic Exception.
pub(crate) fn db_failure(entity: &str, err: &DbErr) -> Outcome {
    let text = err.to_string();
    if text.contains("UNIQUE constraint failed") {
        Outcome::duplicated_entry(entity)
    } else {
        Outcome::exception(text)
    }
}

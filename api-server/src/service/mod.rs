//! 业务服务层
//!
//! Each service wraps the application `Database` and owns the queries for
//! one feature area. Handlers build a service per request.

pub mod auth;
pub mod ideas;
pub mod teams;
pub mod users;

use chrono::{SecondsFormat, Utc};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Collection;
use serde::de::DeserializeOwned;

use common::errors::AppResult;

pub use auth::AuthService;
pub use ideas::IdeaService;
pub use teams::TeamService;
pub use users::UserService;

const DUPLICATE_KEY: i32 = 11000;

/// Timestamp format stored on documents. Fixed width and UTC, so string
/// order matches time order.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether the error is a unique index violation.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

/// Whether a document with `_id` exists in the collection.
pub(crate) async fn exists<T>(collection: &Collection<T>, id: ObjectId) -> AppResult<bool>
where
    T: Send + Sync,
{
    Ok(collection.count_documents(doc! { "_id": id }).await? > 0)
}

/// Drains a query into a vector, converting each document.
pub(crate) async fn collect<T, U>(mut cursor: mongodb::Cursor<T>) -> AppResult<Vec<U>>
where
    T: DeserializeOwned + Send + Sync,
    U: From<T>,
{
    let mut items = Vec::new();
    while cursor.advance().await? {
        items.push(U::from(cursor.deserialize_current()?));
    }
    Ok(items)
}

/// `$set` body with `updated_at` stamped on.
pub(crate) fn stamped(mut set: Document) -> Document {
    set.insert("updated_at", now_rfc3339());
    doc! { "$set": set }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamps_sort_chronologically() {
        let a = now_rfc3339();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = now_rfc3339();
        assert!(a < b);
        assert!(a.ends_with('Z'));
    }

    #[test]
    fn test_stamped_wraps_in_set() {
        let update = stamped(doc! { "name": "x" });
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("name").unwrap(), "x");
        assert!(set.contains_key("updated_at"));
    }
}

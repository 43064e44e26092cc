//! ObjectId parsing for path and body ids.

use mongodb::bson::oid::ObjectId;

use crate::errors::AppError;

/// Parses a 24-character hex id.
///
/// # Errors
/// Returns `AppError::InvalidId` naming `field` when the value is malformed.
pub fn parse_object_id(field: &str, value: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(value.trim())
        .map_err(|_| AppError::InvalidId(format!("{field} must be a 24-character hex id")))
}

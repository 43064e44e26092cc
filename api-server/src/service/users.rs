//! 用户资料服务

use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use common::errors::{AppError, AppResult};
use common::models::user::USERS;
use common::models::{ListUsersQuery, UpdateProfileRequest, UserDocument, UserProfile};

use super::{collect, stamped};

/// Profile queries and updates.
pub struct UserService {
    users: Collection<UserDocument>,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self {
            users: db.collection(USERS),
        }
    }

    /// Lists profiles sorted by name.
    pub async fn list(&self, query: &ListUsersQuery) -> AppResult<Vec<UserProfile>> {
        let cursor = self.users.find(query.filter()).sort(doc! { "name": 1 }).await?;
        collect(cursor).await
    }

    pub async fn get(&self, id: ObjectId) -> AppResult<UserProfile> {
        self.users
            .find_one(doc! { "_id": id })
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::NotFound("user".into()))
    }

    /// Applies a partial profile update and returns the updated profile.
    pub async fn update(&self, id: ObjectId, req: UpdateProfileRequest) -> AppResult<UserProfile> {
        let set = req
            .into_set_document()
            .ok_or_else(|| AppError::Validation("no profile fields to update".into()))?;

        let updated = self
            .users
            .find_one_and_update(doc! { "_id": id }, stamped(set))
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::NotFound("user".into()))?;

        tracing::info!(id = %id, "用户资料已更新");
        Ok(UserProfile::from(updated))
    }
}

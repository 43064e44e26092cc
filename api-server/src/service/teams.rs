//! 团队服务

use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use common::errors::{AppError, AppResult};
use common::models::idea::IDEAS;
use common::models::team::TEAMS;
use common::models::user::USERS;
use common::models::{
    CreateTeamRequest, TeamDocument, TeamItem, UpdateTeamRequest, UserDocument,
};

use super::{collect, exists, now_rfc3339, stamped};

/// Team CRUD and membership.
pub struct TeamService {
    teams: Collection<TeamDocument>,
    users: Collection<UserDocument>,
    ideas: Collection<Document>,
}

impl TeamService {
    pub fn new(db: Database) -> Self {
        Self {
            teams: db.collection(TEAMS),
            users: db.collection(USERS),
            ideas: db.collection(IDEAS),
        }
    }

    /// Lists teams, newest first.
    pub async fn list(&self) -> AppResult<Vec<TeamItem>> {
        let cursor = self.teams.find(doc! {}).sort(doc! { "created_at": -1 }).await?;
        collect(cursor).await
    }

    pub async fn get(&self, id: ObjectId) -> AppResult<TeamItem> {
        self.find(id).await.map(TeamItem::from)
    }

    /// Creates a team with its owner as the only member.
    pub async fn create(&self, owner_id: ObjectId, req: CreateTeamRequest) -> AppResult<TeamItem> {
        if !exists(&self.users, owner_id).await? {
            return Err(AppError::NotFound("owner".into()));
        }

        let mut team = req.into_document(owner_id, now_rfc3339());
        let result = self.teams.insert_one(&team).await?;
        team.id = result.inserted_id.as_object_id();

        tracing::info!(name = %team.name, owner = %owner_id, "团队已创建");
        Ok(TeamItem::from(team))
    }

    /// Applies a partial update. A capacity below the current member count
    /// is rejected by the update filter, atomically with the write.
    pub async fn update(&self, id: ObjectId, req: UpdateTeamRequest) -> AppResult<TeamItem> {
        let max_members = req.max_members;
        let set = req
            .into_set_document()
            .ok_or_else(|| AppError::Validation("no team fields to update".into()))?;

        let updated = self
            .teams
            .find_one_and_update(update_filter(id, max_members), stamped(set))
            .return_document(ReturnDocument::After)
            .await?;
        if let Some(team) = updated {
            return Ok(TeamItem::from(team));
        }

        // Nothing matched: either the team is gone or it has too many members.
        let team = self.find(id).await?;
        if let Some(max) = max_members {
            team.check_capacity(max)?;
        }
        Err(AppError::Conflict("team changed, try again".into()))
    }

    /// Deletes a team and detaches its ideas.
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.teams.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound("team".into()));
        }

        self.ideas
            .update_many(doc! { "team_id": id }, doc! { "$unset": { "team_id": "" } })
            .await?;

        tracing::info!(id = %id, "团队已删除");
        Ok(())
    }

    /// Adds `user_id` to the team.
    pub async fn join(&self, id: ObjectId, user_id: ObjectId) -> AppResult<TeamItem> {
        if !exists(&self.users, user_id).await? {
            return Err(AppError::NotFound("user".into()));
        }

        self.find(id).await?.check_join(&user_id)?;

        let update = doc! {
            "$push": { "members": user_id },
            "$set": { "updated_at": now_rfc3339() },
        };

        self.teams
            .find_one_and_update(join_filter(id, user_id), update)
            .return_document(ReturnDocument::After)
            .await?
            .map(TeamItem::from)
            .ok_or_else(|| AppError::Conflict("team changed, try again".into()))
    }

    /// Removes `user_id` from the team. The owner cannot leave.
    pub async fn leave(&self, id: ObjectId, user_id: ObjectId) -> AppResult<TeamItem> {
        self.find(id).await?.check_leave(&user_id)?;

        let update = doc! {
            "$pull": { "members": user_id },
            "$set": { "updated_at": now_rfc3339() },
        };

        self.teams
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await?
            .map(TeamItem::from)
            .ok_or_else(|| AppError::NotFound("team".into()))
    }

    async fn find(&self, id: ObjectId) -> AppResult<TeamDocument> {
        self.teams
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound("team".into()))
    }
}

/// Matches the team only while `user_id` is absent and a seat is free.
/// Re-checks the join rules against concurrent joins.
fn join_filter(id: ObjectId, user_id: ObjectId) -> Document {
    doc! {
        "_id": id,
        "members": { "$ne": user_id },
        "$expr": { "$lt": [{ "$size": "$members" }, "$max_members"] },
    }
}

/// Matches the team, and with a new capacity only while the members fit.
fn update_filter(id: ObjectId, max_members: Option<u32>) -> Document {
    let mut filter = doc! { "_id": id };
    if let Some(max) = max_members {
        filter.insert(
            "$expr",
            doc! { "$lte": [{ "$size": "$members" }, i64::from(max)] },
        );
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_filter_guards_capacity() {
        let id = ObjectId::new();
        assert_eq!(update_filter(id, None), doc! { "_id": id });
        assert_eq!(
            update_filter(id, Some(3)),
            doc! {
                "_id": id,
                "$expr": { "$lte": [{ "$size": "$members" }, 3_i64] },
            }
        );
    }

    #[test]
    fn test_join_filter_excludes_members_and_full_teams() {
        let id = ObjectId::new();
        let user = ObjectId::new();
        let filter = join_filter(id, user);
        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert_eq!(
            filter.get_document("members").unwrap(),
            &doc! { "$ne": user }
        );
        assert!(filter.get_document("$expr").unwrap().contains_key("$lt"));
    }
}

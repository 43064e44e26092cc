//! Team models.

use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::utils::normalize_tags;

/// Collection name.
pub const TEAMS: &str = "teams";

/// Team size used when the creator does not pick one.
pub const DEFAULT_MAX_MEMBERS: u32 = 4;

/// Team as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: ObjectId,
    /// Member ids; the owner is always the first entry.
    pub members: Vec<ObjectId>,
    #[serde(default)]
    pub skills_needed: Vec<String>,
    pub max_members: u32,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl TeamDocument {
    pub fn is_member(&self, user_id: &ObjectId) -> bool {
        self.members.contains(user_id)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_members as usize
    }

    /// Checks that `user_id` may join: not yet a member and a free seat.
    pub fn check_join(&self, user_id: &ObjectId) -> AppResult<()> {
        if self.is_member(user_id) {
            return Err(AppError::Conflict("user is already a member".into()));
        }
        if self.is_full() {
            return Err(AppError::Conflict("team is full".into()));
        }
        Ok(())
    }

    /// Checks that `user_id` may leave. The owner never can.
    pub fn check_leave(&self, user_id: &ObjectId) -> AppResult<()> {
        if self.owner_id == *user_id {
            return Err(AppError::Forbidden("the team owner cannot leave the team".into()));
        }
        if !self.is_member(user_id) {
            return Err(AppError::NotFound("member".into()));
        }
        Ok(())
    }

    /// Checks that the current members fit in a capacity of `max_members`.
    pub fn check_capacity(&self, max_members: u32) -> AppResult<()> {
        if self.members.len() > max_members as usize {
            return Err(AppError::Conflict(format!(
                "team already has {} members",
                self.members.len()
            )));
        }
        Ok(())
    }
}

/// Team for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamItem {
    /// Team ID.
    pub id: String,
    /// Team name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Owner user ID.
    pub owner_id: String,
    /// Member user IDs.
    pub members: Vec<String>,
    /// Skills the team is looking for.
    pub skills_needed: Vec<String>,
    /// Capacity.
    pub max_members: u32,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<TeamDocument> for TeamItem {
    fn from(team: TeamDocument) -> Self {
        Self {
            id: team.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: team.name,
            description: team.description,
            owner_id: team.owner_id.to_hex(),
            members: team.members.iter().map(|id| id.to_hex()).collect(),
            skills_needed: team.skills_needed,
            max_members: team.max_members,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Request body for creating a team.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeamRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "crate::utils::not_blank")
    )]
    pub name: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Creating user; becomes the first member.
    pub owner_id: String,
    pub skills_needed: Option<Vec<String>>,
    #[validate(range(min = 2, max = 20, message = "Team size must be 2-20"))]
    pub max_members: Option<u32>,
}

impl CreateTeamRequest {
    /// Converts the request into a document owned by `owner_id`.
    pub fn into_document(self, owner_id: ObjectId, created_at: String) -> TeamDocument {
        TeamDocument {
            id: None,
            name: self.name.trim().to_string(),
            description: self.description.unwrap_or_default(),
            owner_id,
            members: vec![owner_id],
            skills_needed: normalize_tags(self.skills_needed.unwrap_or_default()),
            max_members: self.max_members.unwrap_or(DEFAULT_MAX_MEMBERS),
            created_at,
            updated_at: None,
        }
    }
}

/// Partial team update.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTeamRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "crate::utils::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    pub skills_needed: Option<Vec<String>>,
    #[validate(range(min = 2, max = 20, message = "Team size must be 2-20"))]
    pub max_members: Option<u32>,
}

impl UpdateTeamRequest {
    /// Builds the `$set` body, or `None` when nothing was provided.
    pub fn into_set_document(self) -> Option<Document> {
        let mut set = Document::new();
        if let Some(name) = self.name {
            set.insert("name", name.trim());
        }
        if let Some(description) = self.description {
            set.insert("description", description);
        }
        if let Some(skills) = self.skills_needed {
            set.insert("skills_needed", normalize_tags(skills));
        }
        if let Some(max) = self.max_members {
            set.insert("max_members", i64::from(max));
        }
        (!set.is_empty()).then_some(set)
    }
}

/// Body for join/leave.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MembershipRequest {
    pub user_id: String,
}

//! Idea models.

use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::normalize_tags;

/// Collection name.
pub const IDEAS: &str = "ideas";

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Idea as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<ObjectId>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Idea for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdeaItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<IdeaDocument> for IdeaItem {
    fn from(idea: IdeaDocument) -> Self {
        Self {
            id: idea.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: idea.title,
            description: idea.description,
            tags: idea.tags,
            author_id: idea.author_id.to_hex(),
            team_id: idea.team_id.map(|id| id.to_hex()),
            created_at: idea.created_at,
            updated_at: idea.updated_at,
        }
    }
}

/// Request body for submitting an idea.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIdeaRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "crate::utils::not_blank")
    )]
    pub title: String,
    #[validate(
        length(min = 1, max = 5000, message = "Description must be 1-5000 characters"),
        custom(function = "crate::utils::not_blank")
    )]
    pub description: String,
    pub tags: Option<Vec<String>>,
    pub author_id: String,
    /// Team the idea belongs to, if any.
    pub team_id: Option<String>,
}

impl CreateIdeaRequest {
    /// Converts the request into a document with resolved ids.
    pub fn into_document(
        self,
        author_id: ObjectId,
        team_id: Option<ObjectId>,
        created_at: String,
    ) -> IdeaDocument {
        IdeaDocument {
            id: None,
            title: self.title.trim().to_string(),
            description: self.description,
            tags: normalize_tags(self.tags.unwrap_or_default()),
            author_id,
            team_id,
            created_at,
            updated_at: None,
        }
    }
}

/// Partial idea update.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateIdeaRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "crate::utils::not_blank")
    )]
    pub title: Option<String>,
    #[validate(
        length(min = 1, max = 5000, message = "Description must be 1-5000 characters"),
        custom(function = "crate::utils::not_blank")
    )]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateIdeaRequest {
    /// Builds the `$set` body, or `None` when nothing was provided.
    pub fn into_set_document(self) -> Option<Document> {
        let mut set = Document::new();
        if let Some(title) = self.title {
            set.insert("title", title.trim());
        }
        if let Some(description) = self.description {
            set.insert("description", description);
        }
        if let Some(tags) = self.tags {
            set.insert("tags", normalize_tags(tags));
        }
        (!set.is_empty()).then_some(set)
    }
}

/// Query parameters for listing ideas.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListIdeasQuery {
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Items per page (max 100).
    pub page_size: Option<u32>,
    /// Only ideas carrying this tag.
    pub tag: Option<String>,
}

impl ListIdeasQuery {
    /// Page number clamped to at least 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Documents to skip for the current page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.page_size())
    }

    /// MongoDB filter for this query.
    pub fn filter(&self) -> Document {
        match self.tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => doc! { "tags": tag.to_lowercase() },
            _ => doc! {},
        }
    }
}

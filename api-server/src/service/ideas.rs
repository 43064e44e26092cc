//! 创意服务

use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use common::errors::{AppError, AppResult};
use common::models::idea::IDEAS;
use common::models::team::TEAMS;
use common::models::user::USERS;
use common::models::{
    CreateIdeaRequest, IdeaDocument, IdeaItem, ListIdeasQuery, TeamDocument, UpdateIdeaRequest,
    UserDocument,
};
use common::response::PaginatedData;

use super::{collect, exists, now_rfc3339, stamped};

/// Idea CRUD.
pub struct IdeaService {
    ideas: Collection<IdeaDocument>,
    users: Collection<UserDocument>,
    teams: Collection<TeamDocument>,
}

impl IdeaService {
    pub fn new(db: Database) -> Self {
        Self {
            ideas: db.collection(IDEAS),
            users: db.collection(USERS),
            teams: db.collection(TEAMS),
        }
    }

    /// Lists one page of ideas, newest first.
    pub async fn list(&self, query: &ListIdeasQuery) -> AppResult<PaginatedData<IdeaItem>> {
        let filter = query.filter();
        let total = self.ideas.count_documents(filter.clone()).await?;

        let cursor = self
            .ideas
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(query.skip())
            .limit(i64::from(query.page_size()))
            .await?;
        let items = collect(cursor).await?;

        Ok(PaginatedData::new(items, query.page(), query.page_size(), total))
    }

    pub async fn get(&self, id: ObjectId) -> AppResult<IdeaItem> {
        self.ideas
            .find_one(doc! { "_id": id })
            .await?
            .map(IdeaItem::from)
            .ok_or_else(|| AppError::NotFound("idea".into()))
    }

    pub async fn create(
        &self,
        author_id: ObjectId,
        team_id: Option<ObjectId>,
        req: CreateIdeaRequest,
    ) -> AppResult<IdeaItem> {
        if !exists(&self.users, author_id).await? {
            return Err(AppError::NotFound("author".into()));
        }
        if let Some(team_id) = team_id {
            if !exists(&self.teams, team_id).await? {
                return Err(AppError::NotFound("team".into()));
            }
        }

        let mut idea = req.into_document(author_id, team_id, now_rfc3339());
        let result = self.ideas.insert_one(&idea).await?;
        idea.id = result.inserted_id.as_object_id();

        tracing::info!(title = %idea.title, author = %author_id, "创意已提交");
        Ok(IdeaItem::from(idea))
    }

    pub async fn update(&self, id: ObjectId, req: UpdateIdeaRequest) -> AppResult<IdeaItem> {
        let set = req
            .into_set_document()
            .ok_or_else(|| AppError::Validation("no idea fields to update".into()))?;

        self.ideas
            .find_one_and_update(doc! { "_id": id }, stamped(set))
            .return_document(ReturnDocument::After)
            .await?
            .map(IdeaItem::from)
            .ok_or_else(|| AppError::NotFound("idea".into()))
    }

    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.ideas.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound("idea".into()));
        }
        tracing::info!(id = %id, "创意已删除");
        Ok(())
    }
}

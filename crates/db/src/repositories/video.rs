//! Video repository.

use std::sync::Arc;

use crate::entities::{User, Video, user, video};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
    sea_query::{Alias, Expr, extension::postgres::PgExpr},
};
use vidtube_common::{AppError, AppResult};

/// Sortable columns for video listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSort {
    /// Sort by creation time (default).
    #[default]
    CreatedAt,
    /// Sort by view count.
    Views,
    /// Sort by duration.
    Duration,
    /// Sort by title.
    Title,
}

/// Parameters for the paginated video listing.
#[derive(Debug, Clone, Default)]
pub struct VideoListParams {
    /// Case-insensitive title substring filter.
    pub query: Option<String>,
    /// Restrict to a single owner.
    pub owner_id: Option<String>,
    /// Sort column.
    pub sort: VideoSort,
    /// Descending order when true.
    pub descending: bool,
    /// Rows to skip.
    pub offset: u64,
    /// Page size.
    pub limit: u64,
}

/// Video repository for database operations.
#[derive(Clone)]
pub struct VideoRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoRepository {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a video by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<video::Model>> {
        Video::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a video by ID, failing with `NotFound` when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<video::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video not found: {id}")))
    }

    /// Find a video together with its owner.
    pub async fn find_with_owner(
        &self,
        id: &str,
    ) -> AppResult<Option<(video::Model, Option<user::Model>)>> {
        Video::find_by_id(id)
            .find_also_related(User)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Paginated listing with owners resolved in the same query.
    pub async fn list(
        &self,
        params: &VideoListParams,
    ) -> AppResult<Vec<(video::Model, Option<user::Model>)>> {
        let mut query = Video::find().find_also_related(User);

        if let Some(ref text) = params.query {
            query = query.filter(Expr::col((video::Entity, video::Column::Title)).ilike(format!("%{text}%")));
        }

        if let Some(ref owner_id) = params.owner_id {
            query = query.filter(video::Column::OwnerId.eq(owner_id));
        }

        let column = match params.sort {
            VideoSort::CreatedAt => video::Column::CreatedAt,
            VideoSort::Views => video::Column::Views,
            VideoSort::Duration => video::Column::Duration,
            VideoSort::Title => video::Column::Title,
        };

        query = if params.descending {
            query.order_by_desc(column)
        } else {
            query.order_by_asc(column)
        };

        query
            .offset(params.offset)
            .limit(params.limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find videos by a set of IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<video::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Video::find()
            .filter(video::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Videos of an owner, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<video::Model>> {
        Video::find()
            .filter(video::Column::OwnerId.eq(owner_id))
            .order_by_desc(video::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of an owner's videos.
    pub async fn find_ids_by_owner(&self, owner_id: &str) -> AppResult<Vec<String>> {
        Video::find()
            .select_only()
            .column(video::Column::Id)
            .filter(video::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count videos of an owner.
    pub async fn count_by_owner(&self, owner_id: &str) -> AppResult<u64> {
        Video::find()
            .filter(video::Column::OwnerId.eq(owner_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sum of view counters across an owner's videos.
    pub async fn sum_views(&self, owner_id: &str) -> AppResult<i64> {
        let total: Option<Option<i64>> = Video::find()
            .select_only()
            .column_as(
                Expr::col((video::Entity, video::Column::Views))
                    .sum()
                    .cast_as(Alias::new("BIGINT")),
                "total_views",
            )
            .filter(video::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(total.flatten().unwrap_or(0))
    }

    /// Increment the view counter.
    pub async fn increment_views(&self, id: &str) -> AppResult<()> {
        Video::update_many()
            .col_expr(
                video::Column::Views,
                Expr::col((video::Entity, video::Column::Views)).add(1),
            )
            .filter(video::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Create a new video.
    pub async fn create(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply an update.
    pub async fn update(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a video. Returns `true` if a row was removed.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<bool> {
        let deleted = Video::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }
}

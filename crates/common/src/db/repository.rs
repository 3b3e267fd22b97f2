//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling.

use crate::db::models::*;
use crate::db::{timestamp_now, DbPool};
use crate::errors::{classify_write_error, AppError, Result};
use crate::pagination::{Cursor, Page, PageRequest, Positioned};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

/// An article with its author resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleWithAuthor {
    pub article: Article,
    pub author: Author,
}

impl ArticleWithAuthor {
    /// Join result from `find_also_related`; the foreign key guarantees the
    /// author, so a missing one is a storage inconsistency.
    fn from_row((article, author): (Article, Option<Author>)) -> Result<Self> {
        match author {
            Some(author) => Ok(Self { article, author }),
            None => Err(AppError::Internal {
                message: format!(
                    "article {} references missing author {}",
                    article.id, article.author_id
                ),
            }),
        }
    }
}

impl Positioned for ArticleWithAuthor {
    fn position(&self) -> Cursor {
        self.article.position()
    }
}

/// Validated input for a new article
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.connection()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Author Operations
    // ========================================================================

    /// Find author by ID
    pub async fn find_author_by_id(&self, id: i64) -> Result<Option<Author>> {
        AuthorEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Article Operations
    // ========================================================================

    /// Create a new article.
    ///
    /// There is no title existence check: the UNIQUE constraint on
    /// `articles.title` is the only conflict signal, so concurrent creates
    /// with the same title cannot both succeed.
    pub async fn create_article(&self, input: NewArticle) -> Result<ArticleWithAuthor> {
        let author = self
            .find_author_by_id(input.author_id)
            .await?
            .ok_or(AppError::UnknownAuthor { id: input.author_id })?;

        let now = timestamp_now();
        let article = ArticleActiveModel {
            id: NotSet,
            title: Set(input.title.clone()),
            content: Set(input.content),
            author_id: Set(input.author_id),
            updated_at: Set(now),
            created_at: Set(now),
        };

        let article = article
            .insert(self.conn())
            .await
            .map_err(|e| classify_write_error(e, &input.title, input.author_id))?;

        Ok(ArticleWithAuthor { article, author })
    }

    /// Find article by ID, author included
    pub async fn find_article_by_id(&self, id: i64) -> Result<Option<ArticleWithAuthor>> {
        ArticleEntity::find_by_id(id)
            .find_also_related(AuthorEntity)
            .one(self.conn())
            .await?
            .map(ArticleWithAuthor::from_row)
            .transpose()
    }

    /// Fetch one page of articles strictly after the request cursor,
    /// ordered by creation time with the id as tie-break.
    pub async fn list_articles(&self, request: &PageRequest) -> Result<Page<ArticleWithAuthor>> {
        let after = request.after;
        let lower_bound = match after.id {
            Some(id) => Condition::any()
                .add(ArticleColumn::CreatedAt.gt(after.created_at))
                .add(
                    Condition::all()
                        .add(ArticleColumn::CreatedAt.eq(after.created_at))
                        .add(ArticleColumn::Id.gt(id)),
                ),
            None => Condition::all().add(ArticleColumn::CreatedAt.gt(after.created_at)),
        };

        let items = ArticleEntity::find()
            .find_also_related(AuthorEntity)
            .filter(lower_bound)
            .order_by_asc(ArticleColumn::CreatedAt)
            .order_by_asc(ArticleColumn::Id)
            .limit(request.size)
            .all(self.conn())
            .await?
            .into_iter()
            .map(ArticleWithAuthor::from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::from_fetch(items, request))
    }

    /// Delete article by ID; false when no such article exists
    pub async fn delete_article(&self, id: i64) -> Result<bool> {
        let result = ArticleEntity::delete_by_id(id)
            .exec(self.conn())
            .await?;

        Ok(result.rows_affected > 0)
    }
}

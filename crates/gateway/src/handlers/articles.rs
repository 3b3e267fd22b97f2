//! Article handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::AppState;
use broadsheet_common::{
    db::{ArticleWithAuthor, NewArticle, Repository},
    errors::{AppError, Result},
    metrics,
    pagination::PageRequest,
};

/// Response header carrying the next page's cursor; empty at the end
pub const CURSOR_HEADER: HeaderName = HeaderName::from_static("x-cursor");

/// Query string of the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Page size; zero, empty or absent means the default
    #[serde(default, deserialize_with = "empty_as_none")]
    pub num: Option<u64>,

    /// Opaque cursor from a previous response's `X-Cursor`
    pub cursor: Option<String>,
}

/// `num=` with no value counts as omitted
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Request to create a new article
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 2, max = 45))]
    pub title: String,

    #[validate(length(min = 4))]
    pub content: String,

    #[validate(nested)]
    pub author: AuthorRef,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AuthorRef {
    #[validate(range(min = 1))]
    pub id: i64,
}

/// Article representation
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: AuthorResponse,
    pub updated_at: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub name: String,
    pub updated_at: String,
    pub created_at: String,
}

impl From<ArticleWithAuthor> for ArticleResponse {
    fn from(row: ArticleWithAuthor) -> Self {
        let ArticleWithAuthor { article, author } = row;
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            author: AuthorResponse {
                id: author.id,
                name: author.name,
                updated_at: author.updated_at.to_rfc3339(),
                created_at: author.created_at.to_rfc3339(),
            },
            updated_at: article.updated_at.to_rfc3339(),
            created_at: article.created_at.to_rfc3339(),
        }
    }
}

/// Path ids must be non-zero
fn article_id(path: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    let Path(id) = path?;
    if id == 0 {
        return Err(AppError::Validation {
            message: "article id must be non-zero".to_string(),
            details: None,
        });
    }
    Ok(id)
}

/// List articles created after the cursor, oldest first
pub async fn list_articles(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let request = PageRequest::from_query(
        query.num,
        query.cursor.as_deref(),
        &state.config.pagination,
    )?;

    let repo = Repository::new(state.db.clone());
    let page = repo.list_articles(&request).await?;

    metrics::record_list_page(page.len(), page.has_more());
    tracing::debug!(
        page_size = request.size,
        returned = page.len(),
        has_more = page.has_more(),
        "Article page listed"
    );

    let next_cursor = HeaderValue::from_str(&page.next_cursor).map_err(|e| AppError::Internal {
        message: format!("cursor is not a valid header value: {}", e),
    })?;
    let body: Vec<ArticleResponse> = page.items.into_iter().map(ArticleResponse::from).collect();

    Ok(([(CURSOR_HEADER, next_cursor)], Json(body)))
}

/// Create a new article
pub async fn create_article(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ArticleResponse>)> {
    let Json(request) = payload?;
    request.validate().map_err(AppError::from_validation)?;

    let repo = Repository::new(state.db.clone());
    let created = repo
        .create_article(NewArticle {
            title: request.title,
            content: request.content,
            author_id: request.author.id,
        })
        .await?;

    metrics::record_article_created();
    tracing::info!(
        article_id = created.article.id,
        author_id = created.author.id,
        title = %created.article.title,
        "Article created"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get an article by ID
pub async fn get_article(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<ArticleResponse>> {
    let id = article_id(path)?;
    let repo = Repository::new(state.db.clone());

    let article = repo
        .find_article_by_id(id)
        .await?
        .ok_or(AppError::ArticleNotFound { id })?;

    Ok(Json(article.into()))
}

/// Delete an article
pub async fn delete_article(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let id = article_id(path)?;
    let repo = Repository::new(state.db.clone());

    if !repo.delete_article(id).await? {
        return Err(AppError::ArticleNotFound { id });
    }

    metrics::record_article_deleted();
    tracing::info!(article_id = id, "Article deleted");

    Ok(StatusCode::NO_CONTENT)
}

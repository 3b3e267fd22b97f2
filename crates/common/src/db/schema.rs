//! Schema bootstrap
//!
//! Creates the `authors` and `articles` tables from the entity definitions
//! when they are missing, then seeds the built-in authors. Runs once at
//! process start, before traffic is served.

use crate::db::models::*;
use crate::db::{timestamp_now, DbPool};
use crate::errors::Result;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Schema, Set};
use tracing::info;

/// An author created at startup
#[derive(Debug, Clone, Copy)]
pub struct SeedAuthor {
    pub id: i64,
    pub name: &'static str,
}

/// Authors are not created through the API; these always exist
pub const DEFAULT_AUTHORS: &[SeedAuthor] = &[SeedAuthor {
    id: 1,
    name: "Iman Tumorang",
}];

/// Create tables and seed the default authors
pub async fn bootstrap(pool: &DbPool) -> Result<()> {
    create_tables(pool).await?;
    seed_authors(pool, DEFAULT_AUTHORS).await?;
    Ok(())
}

/// Create missing tables and indexes. Existing tables are left untouched.
pub async fn create_tables(pool: &DbPool) -> Result<()> {
    let conn = pool.connection();
    let backend = pool.backend();
    let schema = Schema::new(backend);

    // authors first: articles.author_id references it
    let mut authors = schema.create_table_from_entity(AuthorEntity);
    authors.if_not_exists();
    conn.execute(backend.build(&authors)).await?;

    let mut articles = schema.create_table_from_entity(ArticleEntity);
    articles.if_not_exists();
    conn.execute(backend.build(&articles)).await?;

    for mut index in schema.create_index_from_entity(ArticleEntity) {
        index.if_not_exists();
        conn.execute(backend.build(&index)).await?;
    }

    info!("Database schema ready");
    Ok(())
}

/// Insert each seed author that does not exist yet
pub async fn seed_authors(pool: &DbPool, seeds: &[SeedAuthor]) -> Result<()> {
    let conn = pool.connection();

    for seed in seeds {
        if AuthorEntity::find_by_id(seed.id).one(conn).await?.is_some() {
            continue;
        }

        let now = timestamp_now();
        AuthorActiveModel {
            id: Set(seed.id),
            name: Set(seed.name.to_string()),
            updated_at: Set(now),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;

        info!(author_id = seed.id, name = seed.name, "Seeded author");
    }

    Ok(())
}

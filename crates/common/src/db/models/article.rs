//! Article entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pagination::{Cursor, Positioned};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Unique across all articles; the constraint is the conflict signal
    #[sea_orm(column_type = "String(StringLen::N(45))", unique)]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub author_id: i64,

    pub updated_at: DateTimeWithTimeZone,

    /// Millisecond precision, UTC; list ordering key
    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id"
    )]
    Author,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Positioned for Model {
    fn position(&self) -> Cursor {
        Cursor::at(self.created_at, self.id)
    }
}

//! SeaORM entity models
//!
//! Database entities for Broadsheet

mod article;
mod author;

pub use article::{
    Entity as ArticleEntity,
    Model as Article,
    ActiveModel as ArticleActiveModel,
    Column as ArticleColumn,
};

pub use author::{
    Entity as AuthorEntity,
    Model as Author,
    ActiveModel as AuthorActiveModel,
    Column as AuthorColumn,
};

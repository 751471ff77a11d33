//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blogflow_core::domain::PostState;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub state: State,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Workflow state column. Rows holding any other value fail to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum State {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "waiting approval")]
    WaitingApproval,
    #[sea_orm(string_value = "published")]
    Published,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<State> for PostState {
    fn from(state: State) -> Self {
        match state {
            State::Draft => PostState::Draft,
            State::WaitingApproval => PostState::WaitingApproval,
            State::Published => PostState::Published,
        }
    }
}

impl From<PostState> for State {
    fn from(state: PostState) -> Self {
        match state {
            PostState::Draft => State::Draft,
            PostState::WaitingApproval => State::WaitingApproval,
            PostState::Published => State::Published,
        }
    }
}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for blogflow_core::domain::Post {
    fn from(model: Model) -> Self {
        Self::restore(
            model.id,
            model.author_id,
            model.title,
            model.content,
            model.state.into(),
            model.version,
            model.created_at.into(),
            model.updated_at.into(),
        )
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<blogflow_core::domain::Post> for ActiveModel {
    fn from(post: blogflow_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            state: Set(post.state().into()),
            title: Set(post.title),
            content: Set(post.content),
            version: Set(post.version),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

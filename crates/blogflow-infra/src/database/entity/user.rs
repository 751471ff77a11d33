//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for blogflow_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            password_hash: model.password_hash,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            is_active: model.is_active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<blogflow_core::domain::User> for ActiveModel {
    fn from(user: blogflow_core::domain::User) -> Self {
        Self {
            id: Set(user.id),
            email: Set(user.email),
            username: Set(user.username),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            phone_number: Set(user.phone_number),
            password_hash: Set(user.password_hash),
            is_staff: Set(user.is_staff),
            is_superuser: Set(user.is_superuser),
            is_active: Set(user.is_active),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}

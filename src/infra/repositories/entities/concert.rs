//! Concert database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Concert, ConcertStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "concerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub max_seats: i32,
    pub status: String,
    /// Soft delete flag (set together with CANCELED status by the cascade)
    pub deleted: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Concert {
    fn from(model: Model) -> Self {
        Concert {
            id: model.id,
            name: model.name,
            description: model.description,
            max_seats: model.max_seats,
            status: ConcertStatus::from(model.status.as_str()),
            deleted: model.deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

//! Reservation database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Reservation, ReservationStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub concert_id: Uuid,
    pub reserved_at: DateTimeUtc,
    pub status: String,
    /// Set when cancelled by the concert cancellation cascade
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::concert::Entity",
        from = "Column::ConcertId",
        to = "super::concert::Column::Id"
    )]
    Concert,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::concert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Concert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Reservation {
    fn from(model: Model) -> Self {
        Reservation {
            id: model.id,
            user_id: model.user_id,
            concert_id: model.concert_id,
            reserved_at: model.reserved_at,
            status: ReservationStatus::from(model.status.as_str()),
            deleted: model.deleted,
        }
    }
}

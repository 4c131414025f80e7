//! Transaction (audit ledger) database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Transaction, TransactionAction};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    /// Denormalized snapshot of the user's display name at event time
    pub username: String,
    /// Denormalized snapshot of the concert name at event time
    pub concert_name: String,
    pub action: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reservation::Entity",
        from = "Column::ReservationId",
        to = "super::reservation::Column::Id"
    )]
    Reservation,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Transaction {
            id: model.id,
            reservation_id: model.reservation_id,
            user_id: model.user_id,
            username: model.username,
            concert_name: model.concert_name,
            action: TransactionAction::from(model.action.as_str()),
            created_at: model.created_at,
        }
    }
}

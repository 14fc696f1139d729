//! `SeaORM` Entity for savings_goals table.

use fintrack_core::goals::GoalRecord;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::GoalStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "savings_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub target_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub current_amount: Decimal,
    pub target_date: Option<Date>,
    pub status: GoalStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for GoalRecord {
    fn from(model: &Model) -> Self {
        Self {
            name: model.name.clone(),
            description: model.description.clone(),
            target_amount: model.target_amount,
            current_amount: model.current_amount,
            target_date: model.target_date,
            status: model.status.into(),
        }
    }
}

//! `SeaORM` entity definitions.

pub mod budgets;
pub mod savings_goals;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod user_profiles;
pub mod users;

//! Initial schema: users, transactions, budgets, savings goals and user
//! profiles.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_uuid(Users::Id))
                    .col(string_len_uniq(Users::Username, 50))
                    .col(string_len_uniq(Users::Email, 255))
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 16).default("USER"))
                    .col(decimal_len_null(Users::MonthlyIncome, 15, 2))
                    .col(decimal_len_null(Users::CurrentSavings, 15, 2))
                    .col(decimal_len_null(Users::TargetExpenses, 15, 2))
                    .col(timestamp_with_time_zone(Users::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Users::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_uuid(Transactions::Id))
                    .col(uuid(Transactions::UserId))
                    .col(string_len(Transactions::Title, 255))
                    .col(decimal_len(Transactions::Amount, 15, 2))
                    .col(string_len(Transactions::Category, 100))
                    .col(string_len(Transactions::TransactionType, 16))
                    .col(date(Transactions::TransactionDate))
                    .col(text_null(Transactions::Description))
                    .col(
                        timestamp_with_time_zone(Transactions::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Transactions::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_user_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_user_category")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(pk_uuid(Budgets::Id))
                    .col(uuid(Budgets::UserId))
                    .col(string_len(Budgets::Category, 100))
                    .col(integer(Budgets::Month))
                    .col(integer(Budgets::Year))
                    .col(decimal_len(Budgets::BudgetAmount, 15, 2))
                    .col(timestamp_with_time_zone(Budgets::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Budgets::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_budgets_user_id")
                            .from(Budgets::Table, Budgets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Categories are unique per period regardless of case.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_budgets_user_category_period \
                 ON budgets (user_id, LOWER(category), month, year)",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SavingsGoals::Table)
                    .if_not_exists()
                    .col(pk_uuid(SavingsGoals::Id))
                    .col(uuid(SavingsGoals::UserId))
                    .col(string_len(SavingsGoals::Name, 255))
                    .col(text_null(SavingsGoals::Description))
                    .col(decimal_len(SavingsGoals::TargetAmount, 15, 2))
                    .col(decimal_len(SavingsGoals::CurrentAmount, 15, 2).default(0))
                    .col(date_null(SavingsGoals::TargetDate))
                    .col(string_len(SavingsGoals::Status, 16).default("IN_PROGRESS"))
                    .col(
                        timestamp_with_time_zone(SavingsGoals::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(SavingsGoals::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_savings_goals_user_id")
                            .from(SavingsGoals::Table, SavingsGoals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_savings_goals_user_status")
                    .table(SavingsGoals::Table)
                    .col(SavingsGoals::UserId)
                    .col(SavingsGoals::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(pk_uuid(UserProfiles::Id))
                    .col(uuid_uniq(UserProfiles::UserId))
                    .col(string_len(UserProfiles::PreferredCurrency, 3).default("INR"))
                    .col(string_len(UserProfiles::Timezone, 64).default("Asia/Kolkata"))
                    .col(string_len(UserProfiles::DateFormat, 16).default("DD/MM/YYYY"))
                    .col(string_len(UserProfiles::NumberFormat, 8).default("IN"))
                    .col(string_len(UserProfiles::Language, 8).default("en"))
                    .col(string_len(UserProfiles::Theme, 16).default("light"))
                    .col(boolean(UserProfiles::EmailNotifications).default(true))
                    .col(boolean(UserProfiles::SmsNotifications).default(false))
                    .col(boolean(UserProfiles::PushNotifications).default(true))
                    .col(boolean(UserProfiles::WhatsappNotifications).default(false))
                    .col(boolean(UserProfiles::BudgetAlerts).default(true))
                    .col(boolean(UserProfiles::BillReminders).default(true))
                    .col(boolean(UserProfiles::InvestmentAlerts).default(false))
                    .col(boolean(UserProfiles::WeeklySummary).default(true))
                    .col(boolean(UserProfiles::MonthlyReport).default(true))
                    .col(
                        timestamp_with_time_zone(UserProfiles::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(UserProfiles::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_user_id")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavingsGoals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    MonthlyIncome,
    CurrentSavings,
    TargetExpenses,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Transactions {
    Table,
    Id,
    UserId,
    Title,
    Amount,
    Category,
    TransactionType,
    TransactionDate,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Budgets {
    Table,
    Id,
    UserId,
    Category,
    Month,
    Year,
    BudgetAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum SavingsGoals {
    Table,
    Id,
    UserId,
    Name,
    Description,
    TargetAmount,
    CurrentAmount,
    TargetDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum UserProfiles {
    Table,
    Id,
    UserId,
    PreferredCurrency,
    Timezone,
    DateFormat,
    NumberFormat,
    Language,
    Theme,
    EmailNotifications,
    SmsNotifications,
    PushNotifications,
    WhatsappNotifications,
    BudgetAlerts,
    BillReminders,
    InvestmentAlerts,
    WeeklySummary,
    MonthlyReport,
    CreatedAt,
    UpdatedAt,
}

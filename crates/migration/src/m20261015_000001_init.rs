//! Initial schema.
//!
//! - `members`: people who commit pledges
//! - `committees`: sub-ledgers of the church (youth, worship, ...)
//! - `projects`: fundraising campaigns, optionally owned by a committee
//! - `pledges`: commitments with their collected total and stored status
//! - `payments`: immutable applications of funds to one pledge
//! - `offerings` / `expenses`: committee income and outflow movements

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Members {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Committees {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    Name,
    CommitteeId,
    GoalMinor,
    CreatedAt,
}

#[derive(Iden)]
enum Pledges {
    Table,
    Id,
    DebtorId,
    CommitteeId,
    ProjectId,
    Purpose,
    AmountTotalMinor,
    AmountCollectedMinor,
    DueDate,
    StoredStatus,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    LastUpdatedBy,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    PledgeId,
    AmountMinor,
    PaidOn,
    Method,
    Note,
    RegisteredBy,
    CreatedAt,
}

#[derive(Iden)]
enum Offerings {
    Table,
    Id,
    CommitteeId,
    AmountMinor,
    OccurredOn,
    Category,
    Concept,
    ProjectId,
    RegisteredBy,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    CommitteeId,
    AmountMinor,
    OccurredOn,
    Concept,
    PaymentMethod,
    ProjectId,
    ReceiptRef,
    Note,
    RegisteredBy,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Committees
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Committees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Committees::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Committees::Name).string().not_null())
                    .col(ColumnDef::new(Committees::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Projects
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::CommitteeId).string())
                    .col(ColumnDef::new(Projects::GoalMinor).big_integer())
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-committee_id")
                            .from(Projects::Table, Projects::CommitteeId)
                            .to(Committees::Table, Committees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Pledges
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Pledges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pledges::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Pledges::DebtorId).string().not_null())
                    .col(ColumnDef::new(Pledges::CommitteeId).string())
                    .col(ColumnDef::new(Pledges::ProjectId).string())
                    .col(ColumnDef::new(Pledges::Purpose).string())
                    .col(
                        ColumnDef::new(Pledges::AmountTotalMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Pledges::AmountTotalMinor).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Pledges::AmountCollectedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Pledges::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(Pledges::StoredStatus)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Pledges::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Pledges::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Pledges::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Pledges::LastUpdatedBy).string().not_null())
                    .check(
                        Expr::col(Pledges::AmountCollectedMinor)
                            .gte(0)
                            .and(
                                Expr::col(Pledges::AmountCollectedMinor)
                                    .lte(Expr::col(Pledges::AmountTotalMinor)),
                            ),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pledges-debtor_id")
                            .from(Pledges::Table, Pledges::DebtorId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pledges-committee_id")
                            .from(Pledges::Table, Pledges::CommitteeId)
                            .to(Committees::Table, Committees::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pledges-project_id")
                            .from(Pledges::Table, Pledges::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-pledges-debtor_id")
                    .table(Pledges::Table)
                    .col(Pledges::DebtorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-pledges-committee_id")
                    .table(Pledges::Table)
                    .col(Pledges::CommitteeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-pledges-stored_status-due_date")
                    .table(Pledges::Table)
                    .col(Pledges::StoredStatus)
                    .col(Pledges::DueDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Payments::PledgeId).string().not_null())
                    .col(
                        ColumnDef::new(Payments::AmountMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Payments::AmountMinor).gt(0)),
                    )
                    .col(ColumnDef::new(Payments::PaidOn).date().not_null())
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(ColumnDef::new(Payments::Note).string())
                    .col(ColumnDef::new(Payments::RegisteredBy).string().not_null())
                    .col(ColumnDef::new(Payments::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-pledge_id")
                            .from(Payments::Table, Payments::PledgeId)
                            .to(Pledges::Table, Pledges::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-pledge_id-created_at")
                    .table(Payments::Table)
                    .col(Payments::PledgeId)
                    .col(Payments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Offerings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Offerings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Offerings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Offerings::CommitteeId).string().not_null())
                    .col(
                        ColumnDef::new(Offerings::AmountMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Offerings::AmountMinor).gt(0)),
                    )
                    .col(ColumnDef::new(Offerings::OccurredOn).date().not_null())
                    .col(ColumnDef::new(Offerings::Category).string().not_null())
                    .col(ColumnDef::new(Offerings::Concept).string().not_null())
                    .col(ColumnDef::new(Offerings::ProjectId).string())
                    .col(ColumnDef::new(Offerings::RegisteredBy).string().not_null())
                    .col(ColumnDef::new(Offerings::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offerings-committee_id")
                            .from(Offerings::Table, Offerings::CommitteeId)
                            .to(Committees::Table, Committees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-offerings-project_id")
                            .from(Offerings::Table, Offerings::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-offerings-committee_id-occurred_on")
                    .table(Offerings::Table)
                    .col(Offerings::CommitteeId)
                    .col(Offerings::OccurredOn)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Expenses::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Expenses::CommitteeId).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Expenses::AmountMinor).gt(0)),
                    )
                    .col(ColumnDef::new(Expenses::OccurredOn).date().not_null())
                    .col(ColumnDef::new(Expenses::Concept).string().not_null())
                    .col(ColumnDef::new(Expenses::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Expenses::ProjectId).string())
                    .col(ColumnDef::new(Expenses::ReceiptRef).string())
                    .col(ColumnDef::new(Expenses::Note).string())
                    .col(ColumnDef::new(Expenses::RegisteredBy).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-committee_id")
                            .from(Expenses::Table, Expenses::CommitteeId)
                            .to(Committees::Table, Committees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-project_id")
                            .from(Expenses::Table, Expenses::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-committee_id-occurred_on")
                    .table(Expenses::Table)
                    .col(Expenses::CommitteeId)
                    .col(Expenses::OccurredOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offerings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pledges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Committees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        Ok(())
    }
}

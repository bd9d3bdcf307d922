use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Volunteers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Volunteers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Volunteers::Name).string().not_null())
                    .col(ColumnDef::new(Volunteers::Email).string().not_null())
                    .col(ColumnDef::new(Volunteers::Phone).string().not_null())
                    .col(ColumnDef::new(Volunteers::Address).string().not_null().default(""))
                    .col(ColumnDef::new(Volunteers::Skills).string().not_null().default(""))
                    .col(ColumnDef::new(Volunteers::Hours).double().not_null().default(0.0))
                    .col(ColumnDef::new(Volunteers::Status).string().not_null().default("active"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_volunteers_email")
                    .table(Volunteers::Table)
                    .col(Volunteers::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(ColumnDef::new(Events::Date).string().not_null())
                    .col(ColumnDef::new(Events::Location).string().not_null())
                    .col(ColumnDef::new(Events::Description).string().not_null().default(""))
                    .col(ColumnDef::new(Events::RequiredVolunteers).integer().not_null().default(0))
                    .col(ColumnDef::new(Events::Status).string().not_null().default("upcoming"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Tasks::EventId).string().not_null())
                    .col(ColumnDef::new(Tasks::VolunteerId).string().not_null())
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).string().not_null().default(""))
                    .col(ColumnDef::new(Tasks::Priority).string().not_null().default("medium"))
                    .col(ColumnDef::new(Tasks::Status).string().not_null().default("pending"))
                    .col(ColumnDef::new(Tasks::DueDate).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attendance::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Attendance::Date).string().not_null())
                    .col(ColumnDef::new(Attendance::EventId).string().not_null())
                    .col(ColumnDef::new(Attendance::VolunteerId).string().not_null())
                    .col(ColumnDef::new(Attendance::Status).string().not_null().default("present"))
                    .col(ColumnDef::new(Attendance::Hours).double().not_null().default(0.0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Volunteers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Volunteers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Address,
    Skills,
    Hours,
    Status,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Date,
    Location,
    Description,
    RequiredVolunteers,
    Status,
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    EventId,
    VolunteerId,
    Title,
    Description,
    Priority,
    Status,
    DueDate,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    Date,
    EventId,
    VolunteerId,
    Status,
    Hours,
}

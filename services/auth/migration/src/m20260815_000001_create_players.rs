use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Players::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Players::EmailHead).string().not_null())
                    .col(ColumnDef::new(Players::EmailTail).string().not_null())
                    .col(ColumnDef::new(Players::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Players::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Players::TfaEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Players::TfaSecret).string())
                    .col(ColumnDef::new(Players::Favourites).json_binary().not_null())
                    .col(ColumnDef::new(Players::LikedGames).json_binary().not_null())
                    .col(ColumnDef::new(Players::VerificationCode).string())
                    .col(
                        ColumnDef::new(Players::VerificationExpiresAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Email lookup resolves both encrypted halves together. The index is
        // unique: one account per email, so a racing double signup fails on
        // the second insert rather than producing two rows.
        manager
            .create_index(
                Index::create()
                    .table(Players::Table)
                    .col(Players::EmailHead)
                    .col(Players::EmailTail)
                    .name("idx_players_email_halves")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Players {
    Table,
    Id,
    Username,
    EmailHead,
    EmailTail,
    PasswordHash,
    Status,
    TfaEnabled,
    TfaSecret,
    Favourites,
    LikedGames,
    VerificationCode,
    VerificationExpiresAt,
    CreatedAt,
}

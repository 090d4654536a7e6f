use sea_orm::entity::prelude::*;

/// Player account record.
///
/// The email address is never stored whole: `email_head` and `email_tail` are
/// the two independently encrypted halves, and a lookup must match both.
/// `tfa_secret` is the encrypted base32 TOTP secret, present only once
/// two-factor is provisioned.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub email_head: String,
    pub email_tail: String,
    pub password_hash: String,
    /// 0 = pending verification, 1 = active, 2 = blocked, 100 = pending
    /// (gated identically to 0).
    pub status: i16,
    pub tfa_enabled: bool,
    pub tfa_secret: Option<String>,
    /// JSON array of favourite game names.
    pub favourites: Json,
    /// JSON array of liked game names.
    pub liked_games: Json,
    pub verification_code: Option<String>,
    pub verification_expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

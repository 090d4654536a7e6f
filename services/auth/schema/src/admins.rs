use sea_orm::entity::prelude::*;

/// Admin account record. Unlike players, the owner email is stored in
/// plaintext; admin lookup predates the encrypted-email scheme.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 hash of the owner key (the admin password).
    pub owner_key: String,
    /// Lower value = more privileged; 1 is super-admin.
    pub role: i16,
    /// JSON array of module names this admin may act on; ignored for role 1.
    pub access_modules: Json,
    /// 0 = deactivated, 1 = active.
    pub status: i16,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

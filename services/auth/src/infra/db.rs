use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    SqlErr,
};
use uuid::Uuid;

use bullana_auth_schema::{admins, players};

use crate::domain::repository::{AdminRepository, PlayerRepository};
use crate::domain::types::{
    AccountStatus, AdminAccount, AdminLoginRecord, NewPlayer, PlayerAccount, PlayerLoginRecord,
    RegistrationRecord,
};
use crate::error::AuthServiceError;

// ── Player repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPlayerRepository {
    pub db: DatabaseConnection,
}

impl PlayerRepository for DbPlayerRepository {
    async fn find_login(
        &self,
        email_head: &str,
        email_tail: &str,
    ) -> Result<Option<PlayerLoginRecord>, AuthServiceError> {
        let model = players::Entity::find()
            .filter(players::Column::EmailHead.eq(email_head))
            .filter(players::Column::EmailTail.eq(email_tail))
            .one(&self.db)
            .await
            .context("find player login by email halves")?;
        Ok(model.map(login_from_model))
    }

    async fn find_login_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<PlayerLoginRecord>, AuthServiceError> {
        let model = players::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find player login by id")?;
        Ok(model.map(login_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PlayerAccount>, AuthServiceError> {
        let model = players::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find player by id")?;
        Ok(model.map(account_from_model))
    }

    async fn username_taken(&self, username: &str) -> Result<bool, AuthServiceError> {
        use sea_orm::PaginatorTrait;
        let count = players::Entity::find()
            .filter(players::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count players by username")?;
        Ok(count > 0)
    }

    async fn find_registration(
        &self,
        email_head: &str,
        email_tail: &str,
    ) -> Result<Option<RegistrationRecord>, AuthServiceError> {
        let model = players::Entity::find()
            .filter(players::Column::EmailHead.eq(email_head))
            .filter(players::Column::EmailTail.eq(email_tail))
            .one(&self.db)
            .await
            .context("find registration by email halves")?;
        Ok(model.map(|m| RegistrationRecord {
            id: m.id,
            username: m.username,
            status: AccountStatus::from_code(m.status),
            verification_code: m.verification_code,
            verification_expires_at: m.verification_expires_at,
        }))
    }

    async fn create(&self, player: &NewPlayer) -> Result<(), AuthServiceError> {
        let insert = players::ActiveModel {
            id: Set(player.id),
            username: Set(player.username.clone()),
            email_head: Set(player.email_head.clone()),
            email_tail: Set(player.email_tail.clone()),
            password_hash: Set(player.password_hash.clone()),
            status: Set(AccountStatus::Pending.code()),
            tfa_enabled: Set(false),
            tfa_secret: Set(player.tfa_secret.clone()),
            favourites: Set(serde_json::json!([])),
            liked_games: Set(serde_json::json!([])),
            verification_code: Set(Some(player.verification_code.clone())),
            verification_expires_at: Set(Some(player.verification_expires_at)),
            created_at: Set(player.created_at),
        }
        .insert(&self.db)
        .await;
        match insert {
            Ok(_) => Ok(()),
            // The unique index on the email halves (and the unique username
            // column) backstops the duplicate check under concurrent signups.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AuthServiceError::AlreadyRegistered)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create player").into()),
        }
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        players::ActiveModel {
            id: Set(id),
            verification_code: Set(Some(code.to_owned())),
            verification_expires_at: Set(Some(expires_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set verification code")?;
        Ok(())
    }

    async fn activate(&self, id: Uuid) -> Result<(), AuthServiceError> {
        players::ActiveModel {
            id: Set(id),
            status: Set(AccountStatus::Active.code()),
            verification_code: Set(None),
            verification_expires_at: Set(None),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("activate player")?;
        Ok(())
    }
}

fn login_from_model(model: players::Model) -> PlayerLoginRecord {
    PlayerLoginRecord {
        id: model.id,
        username: model.username,
        email_head: model.email_head,
        email_tail: model.email_tail,
        password_hash: model.password_hash,
        status: AccountStatus::from_code(model.status),
        tfa_enabled: model.tfa_enabled,
        tfa_secret: model.tfa_secret,
    }
}

/// Projection boundary: the password hash and TOTP secret never leave here.
fn account_from_model(model: players::Model) -> PlayerAccount {
    PlayerAccount {
        id: model.id,
        username: model.username,
        email_head: model.email_head,
        email_tail: model.email_tail,
        status: AccountStatus::from_code(model.status),
        tfa_enabled: model.tfa_enabled,
        favourites: string_list(model.favourites),
        liked_games: string_list(model.liked_games),
        created_at: model.created_at,
    }
}

fn string_list(value: serde_json::Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

// ── Admin repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAdminRepository {
    pub db: DatabaseConnection,
}

impl AdminRepository for DbAdminRepository {
    async fn find_login(
        &self,
        email: &str,
    ) -> Result<Option<AdminLoginRecord>, AuthServiceError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find admin by email")?;
        Ok(model.map(|m| AdminLoginRecord {
            id: m.id,
            username: m.username,
            email: m.email,
            owner_key: m.owner_key,
            role: m.role,
            access_modules: string_list(m.access_modules),
            status: AccountStatus::from_code(m.status),
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AuthServiceError> {
        let model = admins::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find admin by id")?;
        Ok(model.map(|m| AdminAccount {
            id: m.id,
            username: m.username,
            email: m.email,
            role: m.role,
            access_modules: string_list(m.access_modules),
            status: AccountStatus::from_code(m.status),
        }))
    }
}

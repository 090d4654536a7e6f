use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthServiceError;
use crate::middleware::AuthenticatedAdmin;
use crate::state::AppState;
use crate::usecase::admin::{AdminLoginInput, AdminLoginUseCase};

// ── POST /admin/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub owner_key: String,
}

#[derive(Serialize)]
pub struct AdminSummary {
    pub id: Uuid,
    pub username: String,
    pub role: i16,
    pub access_modules: Vec<String>,
}

#[derive(Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub expires_at: u64,
    pub admin: AdminSummary,
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = AdminLoginUseCase {
        admins: state.admin_repo(),
        clock: state.clock,
        token_keys: state.token_keys.clone(),
    };
    let out = usecase
        .execute(AdminLoginInput {
            email: body.email,
            owner_key: body.owner_key,
        })
        .await?;
    Ok(Json(AdminLoginResponse {
        token: out.token,
        expires_at: out.expires_at,
        admin: AdminSummary {
            id: out.admin_id,
            username: out.username,
            role: out.role,
            access_modules: out.access_modules,
        },
    }))
}

// ── GET /admin/validate ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminValidateResponse {
    pub admin_id: Uuid,
    pub username: String,
    pub role: i16,
    pub access_modules: Vec<String>,
    #[serde(rename = "type")]
    pub principal_type: &'static str,
}

pub async fn admin_validate(admin: AuthenticatedAdmin) -> Json<AdminValidateResponse> {
    Json(AdminValidateResponse {
        admin_id: admin.admin_id,
        username: admin.admin.username,
        role: admin.admin.role,
        access_modules: admin.admin.access_modules,
        principal_type: "admin",
    })
}

// ── GET /admin/access/{module} ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminAccessResponse {
    pub module: String,
    pub granted: bool,
}

pub async fn admin_access(
    admin: AuthenticatedAdmin,
    Path(module): Path<String>,
) -> Result<Json<AdminAccessResponse>, AuthServiceError> {
    admin.require_module(&module)?;
    Ok(Json(AdminAccessResponse {
        module,
        granted: true,
    }))
}

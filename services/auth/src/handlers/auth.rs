use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthServiceError;
use crate::middleware::AuthenticatedPlayer;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginOutput, LoginUseCase, LogoutUseCase, SessionOutput};
use crate::usecase::register::{
    RegisterInput, RegisterUseCase, ResendVerificationInput, ResendVerificationUseCase,
    VerifyRegistrationInput, VerifyRegistrationUseCase,
};
use crate::usecase::two_factor::{VerifyTwoFactorInput, VerifyTwoFactorUseCase};

#[derive(Serialize)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: u64,
    pub player: PlayerSummary,
}

impl From<SessionOutput> for SessionResponse {
    fn from(out: SessionOutput) -> Self {
        Self {
            token: out.token,
            expires_at: out.expires_at,
            player: PlayerSummary {
                id: out.player_id,
                username: out.username,
                email: out.email,
            },
        }
    }
}

// ── POST /auth/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub player_id: Uuid,
    pub code_resent: bool,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RegisterUseCase {
        players: state.player_repo(),
        mailer: state.mailer(),
        clock: state.clock,
        cipher: state.cipher.clone(),
        totp_issuer: state.totp_issuer.clone(),
    };
    let out = usecase
        .execute(RegisterInput {
            email: body.email,
            username: body.username,
            password: body.password,
        })
        .await?;
    let status = if out.code_resent {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(RegisterResponse {
            player_id: out.player_id,
            code_resent: out.code_resent,
        }),
    ))
}

// ── POST /auth/verify-registration ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRegistrationRequest {
    pub email: String,
    pub code: String,
}

pub async fn verify_registration(
    State(state): State<AppState>,
    Json(body): Json<VerifyRegistrationRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyRegistrationUseCase {
        players: state.player_repo(),
        clock: state.clock,
        cipher: state.cipher.clone(),
        token_keys: state.token_keys.clone(),
    };
    let session = usecase
        .execute(VerifyRegistrationInput {
            email: body.email,
            code: body.code,
        })
        .await?;
    Ok(Json(SessionResponse::from(session)))
}

// ── POST /auth/resend-verification ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

pub async fn resend_verification(
    State(state): State<AppState>,
    Json(body): Json<ResendVerificationRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = ResendVerificationUseCase {
        players: state.player_repo(),
        mailer: state.mailer(),
        clock: state.clock,
        cipher: state.cipher.clone(),
    };
    usecase
        .execute(ResendVerificationInput { email: body.email })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub requires_tfa: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerSummary>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        players: state.player_repo(),
        cache: state.auth_cache(),
        clock: state.clock,
        cipher: state.cipher.clone(),
        token_keys: state.token_keys.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    let response = match out {
        LoginOutput::TwoFactorRequired { temp_token } => LoginResponse {
            requires_tfa: true,
            temp_token: Some(temp_token),
            token: None,
            expires_at: None,
            player: None,
        },
        LoginOutput::Authenticated(session) => {
            let session = SessionResponse::from(session);
            LoginResponse {
                requires_tfa: false,
                temp_token: None,
                token: Some(session.token),
                expires_at: Some(session.expires_at),
                player: Some(session.player),
            }
        }
    };
    Ok(Json(response))
}

// ── POST /auth/verify-2fa ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyTwoFactorRequest {
    pub temp_token: String,
    pub tfa_code: String,
}

pub async fn verify_two_factor(
    State(state): State<AppState>,
    Json(body): Json<VerifyTwoFactorRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyTwoFactorUseCase {
        players: state.player_repo(),
        cache: state.auth_cache(),
        clock: state.clock,
        cipher: state.cipher.clone(),
        token_keys: state.token_keys.clone(),
    };
    let session = usecase
        .execute(VerifyTwoFactorInput {
            temp_token: body.temp_token,
            tfa_code: body.tfa_code,
        })
        .await?;
    Ok(Json(SessionResponse::from(session)))
}

// ── GET /auth/validate ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ValidateResponse {
    pub player_id: Uuid,
    pub username: String,
    #[serde(rename = "type")]
    pub principal_type: &'static str,
}

pub async fn validate(player: AuthenticatedPlayer) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        player_id: player.player_id,
        username: player.player.username,
        principal_type: "user",
    })
}

// ── GET /auth/profile ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub tfa_enabled: bool,
    pub favourites: Vec<String>,
    pub liked_games: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn profile(
    State(state): State<AppState>,
    player: AuthenticatedPlayer,
) -> Result<Json<ProfileResponse>, AuthServiceError> {
    let p = player.player;
    let head = state.cipher.decrypt(&p.email_head)?;
    let tail = state.cipher.decrypt(&p.email_tail)?;
    Ok(Json(ProfileResponse {
        id: p.id,
        username: p.username,
        email: format!("{}{}", head, tail),
        tfa_enabled: p.tfa_enabled,
        favourites: p.favourites,
        liked_games: p.liked_games,
        created_at: p.created_at,
    }))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LogoutUseCase {
        players: state.player_repo(),
        cache: state.auth_cache(),
        clock: state.clock,
        token_keys: state.token_keys.clone(),
    };
    usecase.execute(&headers, &state.origin_policy).await?;
    Ok(StatusCode::NO_CONTENT)
}

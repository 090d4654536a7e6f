use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use bullana_core::health::{healthz, readyz};
use bullana_core::middleware::request_id_layer;

use crate::handlers::{
    admin::{admin_access, admin_login, admin_validate},
    auth::{
        login, logout, profile, register, resend_verification, validate, verify_registration,
        verify_two_factor,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration
        .route("/auth/register", post(register))
        .route("/auth/verify-registration", post(verify_registration))
        .route("/auth/resend-verification", post(resend_verification))
        // Sessions
        .route("/auth/login", post(login))
        .route("/auth/verify-2fa", post(verify_two_factor))
        .route("/auth/validate", get(validate))
        .route("/auth/profile", get(profile))
        .route("/auth/logout", post(logout))
        // Admin
        .route("/admin/login", post(admin_login))
        .route("/admin/validate", get(admin_validate))
        .route("/admin/access/{module}", get(admin_access))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

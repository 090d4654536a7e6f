use axum::http::HeaderMap;
use uuid::Uuid;

use bullana_auth::domain::types::{AccountStatus, Principal};
use bullana_auth::error::AuthServiceError;
use bullana_auth::middleware::{authenticate_admin, authenticate_optional, authenticate_player};
use bullana_auth_types::token::{AdminClaims, Claims, PLAYER_TOKEN_TTL_SECS, PlayerClaims, sign};

use super::helpers::*;

fn player_token(id: Uuid, now: u64) -> String {
    let claims = Claims::User(PlayerClaims::new(
        id,
        "player@example.com".to_owned(),
        "player_one".to_owned(),
        now,
    ));
    sign(&claims, &keys()).unwrap()
}

fn admin_token(id: Uuid, now: u64) -> String {
    let claims = Claims::Admin(AdminClaims::new(
        id,
        "ops@example.com".to_owned(),
        "ops".to_owned(),
        2,
        vec!["support".to_owned()],
        now,
    ));
    sign(&claims, &keys()).unwrap()
}

async fn run_player(
    headers: &HeaderMap,
    repo: MockPlayerRepo,
    cache: MockAuthCache,
    now: u64,
) -> Result<bullana_auth::domain::types::PlayerAccount, AuthServiceError> {
    authenticate_player(headers, &policy(), &keys(), &repo, &cache, &FixedClock(now)).await
}

#[tokio::test]
async fn should_authenticate_active_player() {
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Active, false);
    let id = row.id;
    let token = player_token(id, NOW);
    let player = run_player(
        &bearer_headers(&token),
        MockPlayerRepo::new(vec![row]),
        MockAuthCache::new(),
        NOW + 60,
    )
    .await
    .unwrap();
    assert_eq!(player.id, id);
}

#[tokio::test]
async fn should_allow_listed_origin() {
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Active, false);
    let token = player_token(row.id, NOW);
    let headers = headers_with_origin(&token, "https://play.example.com");
    let result = run_player(&headers, MockPlayerRepo::new(vec![row]), MockAuthCache::new(), NOW + 60).await;
    assert!(result.is_ok(), "listed origin rejected: {result:?}");
}

#[tokio::test]
async fn should_reject_unlisted_origin_before_token_checks() {
    // Even a valid token loses to a bad origin; the stages are ordered.
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Active, false);
    let token = player_token(row.id, NOW);
    let headers = headers_with_origin(&token, "https://evil.example.com");
    let result = run_player(&headers, MockPlayerRepo::new(vec![row]), MockAuthCache::new(), NOW + 60).await;
    assert!(
        matches!(result, Err(AuthServiceError::OriginRejected)),
        "expected OriginRejected, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_credential() {
    let result = run_player(&HeaderMap::new(), MockPlayerRepo::empty(), MockAuthCache::new(), NOW).await;
    assert!(
        matches!(result, Err(AuthServiceError::CredentialMissing)),
        "expected CredentialMissing, got {result:?}"
    );
}

#[tokio::test]
async fn should_accept_x_access_token_header() {
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Active, false);
    let token = player_token(row.id, NOW);
    let mut headers = HeaderMap::new();
    headers.insert("x-access-token", token.parse().unwrap());
    let result = run_player(&headers, MockPlayerRepo::new(vec![row]), MockAuthCache::new(), NOW + 60).await;
    assert!(result.is_ok(), "x-access-token fallback failed: {result:?}");
}

#[tokio::test]
async fn should_reject_expired_token() {
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Active, false);
    let token = player_token(row.id, NOW);
    let result = run_player(
        &bearer_headers(&token),
        MockPlayerRepo::new(vec![row]),
        MockAuthCache::new(),
        NOW + PLAYER_TOKEN_TTL_SECS + 60,
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::CredentialInvalid)),
        "expected CredentialInvalid, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_garbage_token() {
    let result = run_player(
        &bearer_headers("garbage.token.here"),
        MockPlayerRepo::empty(),
        MockAuthCache::new(),
        NOW,
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::CredentialInvalid)),
        "expected CredentialInvalid, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_admin_token_on_player_pipeline() {
    let token = admin_token(Uuid::new_v4(), NOW);
    let result = run_player(
        &bearer_headers(&token),
        MockPlayerRepo::empty(),
        MockAuthCache::new(),
        NOW + 60,
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::PrincipalTypeMismatch)),
        "expected PrincipalTypeMismatch, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_player_token_on_admin_pipeline() {
    let token = player_token(Uuid::new_v4(), NOW);
    let result = authenticate_admin(
        &bearer_headers(&token),
        &policy(),
        &keys(),
        &MockAdminRepo::empty(),
        &MockAuthCache::new(),
        &FixedClock(NOW + 60),
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::PrincipalTypeMismatch)),
        "expected PrincipalTypeMismatch, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_deleted_principal() {
    let token = player_token(Uuid::new_v4(), NOW);
    let result = run_player(
        &bearer_headers(&token),
        MockPlayerRepo::empty(),
        MockAuthCache::new(),
        NOW + 60,
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::PrincipalNotFound)),
        "expected PrincipalNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_player_blocked_after_issuance() {
    // The token is still cryptographically valid; the live status wins.
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Blocked, false);
    let token = player_token(row.id, NOW);
    let result = run_player(
        &bearer_headers(&token),
        MockPlayerRepo::new(vec![row]),
        MockAuthCache::new(),
        NOW + 60,
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::PrincipalInactive)),
        "expected PrincipalInactive, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_revoked_token() {
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Active, false);
    let token = player_token(row.id, NOW);
    let cache = MockAuthCache::new();
    {
        let claims = bullana_auth_types::verify_token(&token, &keys(), NOW + 1).unwrap();
        cache.revoked.lock().unwrap().insert(claims.jti().to_owned());
    }
    let result = run_player(
        &bearer_headers(&token),
        MockPlayerRepo::new(vec![row]),
        cache,
        NOW + 60,
    )
    .await;
    assert!(
        matches!(result, Err(AuthServiceError::CredentialInvalid)),
        "expected CredentialInvalid, got {result:?}"
    );
}

#[tokio::test]
async fn should_authenticate_active_admin() {
    let admin = admin_row("ops@example.com", 2, &["support"]);
    let token = admin_token(admin.id, NOW);
    let result = authenticate_admin(
        &bearer_headers(&token),
        &policy(),
        &keys(),
        &MockAdminRepo::new(vec![admin.clone()]),
        &MockAuthCache::new(),
        &FixedClock(NOW + 60),
    )
    .await
    .unwrap();
    assert_eq!(result.id, admin.id);
    assert_eq!(result.role, 2);
}

#[tokio::test]
async fn optional_auth_returns_player() {
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Active, false);
    let id = row.id;
    let token = player_token(id, NOW);
    let principal = authenticate_optional(
        &bearer_headers(&token),
        &policy(),
        &keys(),
        &MockPlayerRepo::new(vec![row]),
        &MockAdminRepo::empty(),
        &MockAuthCache::new(),
        &FixedClock(NOW + 60),
    )
    .await;
    assert!(matches!(principal, Some(Principal::Player(ref p)) if p.id == id));
}

#[tokio::test]
async fn optional_auth_degrades_to_none_on_bad_token() {
    let principal = authenticate_optional(
        &bearer_headers("garbage"),
        &policy(),
        &keys(),
        &MockPlayerRepo::empty(),
        &MockAdminRepo::empty(),
        &MockAuthCache::new(),
        &FixedClock(NOW),
    )
    .await;
    assert!(principal.is_none());
}

#[tokio::test]
async fn optional_auth_degrades_to_none_on_infra_failure() {
    let (row, _) = player_row("player@example.com", "player_one", AccountStatus::Active, false);
    let token = player_token(row.id, NOW);
    let principal = authenticate_optional(
        &bearer_headers(&token),
        &policy(),
        &keys(),
        &MockPlayerRepo::new(vec![row]),
        &MockAdminRepo::empty(),
        &FailingCache,
        &FixedClock(NOW + 60),
    )
    .await;
    assert!(principal.is_none());
}

#[tokio::test]
async fn optional_auth_degrades_to_none_when_absent() {
    let principal = authenticate_optional(
        &HeaderMap::new(),
        &policy(),
        &keys(),
        &MockPlayerRepo::empty(),
        &MockAdminRepo::empty(),
        &MockAuthCache::new(),
        &FixedClock(NOW),
    )
    .await;
    assert!(principal.is_none());
}

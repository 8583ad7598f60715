use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::verify_password,
    },
    config::Config,
    models::{LoginReqDto, TokenType},
    store::LeaveStore,
    utils::token_revocation,
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::RwLock;
use tracing::{debug, error, info, instrument};

// auth end points

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[instrument(
    name = "auth_login",
    skip(store, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<RwLock<LeaveStore>>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    let guard = match store.read() {
        Ok(g) => g,
        Err(_) => {
            error!("Store lock poisoned");
            return HttpResponse::InternalServerError().finish();
        }
    };

    debug!("Looking up manager");

    let manager = match guard.manager_by_username(&user.username) {
        Some(m) => m,
        None => {
            info!("Invalid credentials: manager not found");
            // same message as a password mismatch: no field disclosure
            return HttpResponse::Unauthorized()
                .json(json!({"message": "Invalid username or password"}));
        }
    };

    debug!(manager_id = manager.id, "Manager found, verifying password");

    if let Err(e) = verify_password(&user.password, &manager.password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized()
            .json(json!({"message": "Invalid username or password"}));
    }

    debug!("Password verified");

    let access_token = generate_access_token(
        manager.id,
        manager.username.clone(),
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let (refresh_token, refresh_claims) = generate_refresh_token(
        manager.id,
        manager.username.clone(),
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    debug!(
        manager_id = manager.id,
        jti = %refresh_claims.jti,
        "Issued refresh token"
    );

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
    })
}

pub async fn refresh_token(
    req: HttpRequest,
    store: web::Data<RwLock<LeaveStore>>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    if token_revocation::is_revoked(&claims.jti).await {
        info!(jti = %claims.jti, "Refresh token already spent");
        return HttpResponse::Unauthorized().finish();
    }

    // the manager behind the token must still exist
    {
        let guard = match store.read() {
            Ok(g) => g,
            Err(_) => return HttpResponse::InternalServerError().finish(),
        };
        if let Err(e) = guard.manager_by_id(claims.manager_id) {
            info!(error = %e, "Refresh token references an unknown manager");
            return HttpResponse::Unauthorized().finish();
        }
    }

    // rotate: the presented token is spent either way
    token_revocation::revoke(&claims.jti).await;

    let access_token = generate_access_token(
        claims.manager_id,
        claims.sub.clone(),
        &config.jwt_secret,
        config.access_token_ttl,
    );

    let (new_refresh_token, new_claims) = generate_refresh_token(
        claims.manager_id,
        claims.sub.clone(),
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    debug!(jti = %new_claims.jti, "Rotated refresh token");

    HttpResponse::Ok().json(serde_json::json!({
        "access_token": access_token,
        "refresh_token": new_refresh_token
    }))
}

pub async fn logout(req: HttpRequest, config: web::Data<Config>) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    // only refresh tokens carry a revocable session
    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    // idempotent: revoking twice is fine
    token_revocation::revoke(&claims.jti).await;

    info!(jti = %claims.jti, "Logged out");

    HttpResponse::NoContent().finish()
}

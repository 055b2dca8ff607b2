//! Login, logout and current-identity endpoints
//!
//! The middleware has already run the chain by the time these handlers see
//! the request; they only read its outcome.

use crate::server::middleware::{AuthenticationContext, Identity};
use crate::server::routes::ApiResponse;
use crate::utils::error::Unauthenticated;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/me", web::get().to(current_identity))
        .route("/logout", web::post().to(logout));
}

/// Identity as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct IdentityResponse {
    /// Strategy that authenticated the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticated_by: Option<String>,
    pub identity: Map<String, Value>,
}

impl IdentityResponse {
    fn new(context: &AuthenticationContext, identity: &Identity) -> Self {
        Self {
            authenticated_by: context.service().authenticated_by().map(str::to_string),
            identity: identity.attributes().clone(),
        }
    }
}

/// Posting credentials here runs the chain; the middleware sets any
/// remember-me cookie on the way out.
pub async fn login(
    context: AuthenticationContext,
    identity: Option<Identity>,
) -> ActixResult<HttpResponse> {
    let Some(identity) = identity else {
        debug!("Login rejected");
        return Err(Unauthenticated::with_message("Invalid credentials").into());
    };

    info!(
        "Login succeeded via {}",
        context.service().authenticated_by().unwrap_or("unknown")
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(IdentityResponse::new(
        &context, &identity,
    ))))
}

/// The authenticated principal; anonymous clients get `Unauthenticated`
pub async fn current_identity(
    context: AuthenticationContext,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(IdentityResponse::new(
        &context, &identity,
    ))))
}

/// Drop every strategy's persisted identity, e.g. the remember-me cookie
pub async fn logout(context: AuthenticationContext) -> ActixResult<HttpResponse> {
    let modification = context.service().clear_identity();

    let mut response = HttpResponse::Ok().json(ApiResponse::success("logged out"));
    modification.apply_to(response.headers_mut())?;
    Ok(response)
}

/// Session capability gate
///
/// One parameterized access check behind two extractors: `CurrentUser`
/// requires a live session, `AdminUser` additionally requires the
/// administrator flag. Handlers state their requirement in the signature and
/// rejection happens before any handler code runs.
///
/// Rejection shape follows the caller: requests that ask for JSON get a 401
/// body, page requests get redirected to the login entry point. A resolved
/// but non-admin identity hitting an admin gate always gets the fixed 403
/// text, with no redirect.
use actix_web::{
    dev::Payload,
    error::ResponseError,
    http::{header, StatusCode},
    web, Error, FromRequest, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::db::session_repo;
use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any authenticated user
    User,
    /// Authenticated user carrying the administrator flag
    Admin,
}

/// Why the gate refused the request
#[derive(Debug, thiserror::Error)]
pub enum GateRejection {
    #[error("Authentication required")]
    Unauthenticated { prefers_json: bool },

    #[error("access denied")]
    Forbidden,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for GateRejection {
    fn status_code(&self) -> StatusCode {
        match self {
            GateRejection::Unauthenticated { prefers_json: true } => StatusCode::UNAUTHORIZED,
            GateRejection::Unauthenticated { prefers_json: false } => StatusCode::FOUND,
            GateRejection::Forbidden => StatusCode::FORBIDDEN,
            GateRejection::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GateRejection::Unauthenticated { prefers_json: true } => HttpResponse::Unauthorized()
                .json(serde_json::json!({"error": "Authentication required"})),
            GateRejection::Unauthenticated { prefers_json: false } => HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            GateRejection::Forbidden => HttpResponse::Forbidden()
                .content_type("text/plain; charset=utf-8")
                .body("access denied"),
            GateRejection::Internal(msg) => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": "INTERNAL_ERROR", "message": msg})),
        }
    }
}

/// Authenticated identity resolved from the session cookie
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }
    }
}

/// `CurrentUser` plus the administrator requirement
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

/// The single capability check both extractors funnel through
async fn resolve_capability(
    req: &HttpRequest,
    capability: Capability,
) -> Result<CurrentUser, GateRejection> {
    let prefers_json = prefers_json(req);

    let cookie_name = req
        .app_data::<web::Data<Config>>()
        .map(|c| c.session.cookie_name.clone())
        .unwrap_or_else(|| "session".to_string());

    let token = req
        .cookie(&cookie_name)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
        .ok_or(GateRejection::Unauthenticated { prefers_json })?;

    let pool = req
        .app_data::<web::Data<PgPool>>()
        .cloned()
        .ok_or_else(|| GateRejection::Internal("database pool not configured".to_string()))?;

    let user = session_repo::find_user_by_token(&pool, token)
        .await
        .map_err(|e| GateRejection::Internal(e.to_string()))?
        .ok_or(GateRejection::Unauthenticated { prefers_json })?;

    if capability == Capability::Admin && !user.is_admin {
        return Err(GateRejection::Forbidden);
    }

    Ok(CurrentUser::from(user))
}

/// A caller "expects a data response" when it explicitly asks for JSON
pub fn prefers_json(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            resolve_capability(&req, Capability::User)
                .await
                .map_err(Error::from)
        })
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            resolve_capability(&req, Capability::Admin)
                .await
                .map(AdminUser)
                .map_err(Error::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::test::TestRequest;

    #[test]
    fn json_callers_are_detected_from_accept_header() {
        let req = TestRequest::default()
            .insert_header((header::ACCEPT, "application/json"))
            .to_http_request();
        assert!(prefers_json(&req));

        let req = TestRequest::default()
            .insert_header((header::ACCEPT, "text/html"))
            .to_http_request();
        assert!(!prefers_json(&req));

        let req = TestRequest::default().to_http_request();
        assert!(!prefers_json(&req));
    }

    #[actix_web::test]
    async fn unauthenticated_json_caller_gets_401() {
        let resp = GateRejection::Unauthenticated { prefers_json: true }.error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Authentication required");
    }

    #[test]
    fn unauthenticated_page_caller_is_redirected_to_login() {
        let resp = GateRejection::Unauthenticated { prefers_json: false }.error_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[actix_web::test]
    async fn non_admin_gets_fixed_403() {
        let resp = GateRejection::Forbidden.error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], b"access denied");
    }
}

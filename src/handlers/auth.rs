/// Registration, login, and logout handlers
use actix_web::{
    cookie::Cookie,
    error::ResponseError,
    http::header,
    web, HttpRequest, HttpResponse,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::session_gate::prefers_json;
use crate::models::{LoginForm, RegisterForm};
use crate::security::password;
use crate::services::SessionService;

const REGISTER_FORM: &str = r#"<form method="post" action="/register">
  <input name="username" placeholder="Username" required>
  <input name="email" type="email" placeholder="Email" required>
  <input name="password" type="password" placeholder="Password" required>
  <button type="submit">Register</button>
</form>
<p><a href="/login">Already have an account?</a></p>"#;

const LOGIN_FORM: &str = r#"<form method="post" action="/login">
  <input name="username" placeholder="Username" required>
  <input name="password" type="password" placeholder="Password" required>
  <button type="submit">Login</button>
</form>
<p><a href="/register">Create an account</a></p>"#;

fn form_page(title: &str, form: &str, error: Option<&str>) -> String {
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", e))
        .unwrap_or_default();
    format!(
        r#"<!doctype html>
<html><head><title>{title}</title></head><body>
<h1>{title}</h1>
{error}{form}
</body></html>"#
    )
}

/// JSON callers get the error taxonomy body; page callers get the same form
/// back with the message inlined, under the same status code.
fn form_failure(
    req: &HttpRequest,
    err: AppError,
    title: &str,
    form: &str,
) -> Result<HttpResponse> {
    if prefers_json(req) {
        return Err(err);
    }

    Ok(HttpResponse::build(err.status_code())
        .content_type("text/html; charset=utf-8")
        .body(form_page(title, form, Some(&err.to_string()))))
}

/// GET /register
pub async fn register_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(form_page("Register", REGISTER_FORM, None))
}

/// POST /register - create a user and start a session
pub async fn register(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse> {
    let username = form.username.trim();
    let email = form.email.trim();

    if username.is_empty() || email.is_empty() || form.password.is_empty() {
        return form_failure(
            &req,
            AppError::Validation("username, email and password are required".to_string()),
            "Register",
            REGISTER_FORM,
        );
    }

    if user_repo::find_by_username(&pool, username).await?.is_some() {
        return form_failure(
            &req,
            AppError::Conflict("username already taken".to_string()),
            "Register",
            REGISTER_FORM,
        );
    }

    let password_hash = password::hash_password(&form.password)?;
    let user = match user_repo::create_user(&pool, username, email, &password_hash).await {
        Ok(user) => user,
        // Duplicate insert racing the check above
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return form_failure(
                &req,
                AppError::Conflict("username or email already taken".to_string()),
                "Register",
                REGISTER_FORM,
            );
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, "user registered");

    let sessions = SessionService::new((**pool).clone(), config.session.ttl_hours);
    let session = sessions.start(user.id).await?;

    Ok(redirect_with_session(&config, "/", session.token))
}

/// GET /login
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(form_page("Login", LOGIN_FORM, None))
}

/// POST /login - verify credentials and start a session.
/// Unknown user and wrong password surface the same generic message.
pub async fn login(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    let user = match user_repo::find_by_username(&pool, form.username.trim()).await? {
        Some(user) if password::verify_password(&form.password, &user.password_hash).is_ok() => {
            user
        }
        _ => {
            return form_failure(
                &req,
                AppError::Authentication("invalid username or password".to_string()),
                "Login",
                LOGIN_FORM,
            );
        }
    };

    tracing::info!(user_id = %user.id, "user logged in");

    let sessions = SessionService::new((**pool).clone(), config.session.ttl_hours);
    let session = sessions.start(user.id).await?;

    Ok(redirect_with_session(&config, "/", session.token))
}

/// GET /logout - end the session and clear the cookie
pub async fn logout(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    if let Some(token) = req
        .cookie(&config.session.cookie_name)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        let sessions = SessionService::new((**pool).clone(), config.session.ttl_hours);
        sessions.end(token).await?;
    }

    let mut removal = Cookie::new(config.session.cookie_name.clone(), "");
    removal.set_path("/");
    removal.make_removal();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/login"))
        .cookie(removal)
        .finish())
}

fn redirect_with_session(config: &Config, location: &str, token: Uuid) -> HttpResponse {
    let cookie = Cookie::build(config.session.cookie_name.clone(), token.to_string())
        .path("/")
        .http_only(true)
        .finish();

    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

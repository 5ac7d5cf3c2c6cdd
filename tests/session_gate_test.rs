use actix_web::{cookie::Cookie, http::header, test, web, App, HttpResponse};

use cinema_service::middleware::{AdminUser, CurrentUser};

async fn user_only(_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn admin_only(_admin: AdminUser) -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[actix_rt::test]
async fn unauthenticated_json_request_gets_401_body() {
    let app = test::init_service(App::new().route("/profile", web::get().to(user_only))).await;

    let req = test::TestRequest::get()
        .uri("/profile")
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "Authentication required");
}

#[actix_rt::test]
async fn unauthenticated_page_request_redirects_to_login() {
    let app = test::init_service(App::new().route("/profile", web::get().to(user_only))).await;

    let req = test::TestRequest::get()
        .uri("/profile")
        .insert_header((header::ACCEPT, "text/html"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_rt::test]
async fn malformed_session_token_counts_as_anonymous() {
    let app = test::init_service(App::new().route("/profile", web::get().to(user_only))).await;

    let req = test::TestRequest::get()
        .uri("/profile")
        .insert_header((header::ACCEPT, "application/json"))
        .cookie(Cookie::new("session", "not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn admin_route_requires_a_session_first() {
    let app = test::init_service(App::new().route("/add_movie", web::get().to(admin_only))).await;

    // Without any session the admin gate behaves like the login gate:
    // 401 for JSON callers, redirect for page callers. The fixed 403 is
    // reserved for resolved non-admin identities.
    let req = test::TestRequest::get()
        .uri("/add_movie")
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/add_movie")
        .insert_header((header::ACCEPT, "text/html"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 302);
}

//! HTTP server assembly: session cookies, tracing and route table.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use account_service::Trace;
#[cfg(debug_assertions)]
use account_service::doc::ApiDoc;
use account_service::inbound::http::auth::{check_auth, login, logout};
use account_service::inbound::http::error::route_not_found;
use account_service::inbound::http::health::{HealthState, live, ready};
use account_service::inbound::http::json::json_config;
use account_service::inbound::http::state::HttpState;
use account_service::inbound::http::users::register;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Everything a worker needs to assemble its `App`.
#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

const SESSION_COOKIE: &str = "session";

/// Private (encrypted) cookie sessions that expire two hours after the
/// last write.
fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    let lifecycle = PersistentSession::default().session_ttl(Duration::hours(2));
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_http_only(true)
        .cookie_secure(cookie_secure)
        .cookie_same_site(same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(lifecycle)
        .build()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = session_middleware(deps.key, deps.cookie_secure, deps.same_site);
    let app = App::new()
        .app_data(deps.health_state)
        .app_data(deps.http_state)
        .app_data(json_config())
        .wrap(session)
        .wrap(Trace)
        .service(register)
        .service(login)
        .service(logout)
        .service(check_auth)
        .service(ready)
        .service(live)
        .default_service(web::to(route_not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the listener and start serving.
///
/// Readiness is reported as soon as the socket is bound, since the user
/// store was already opened while building `config`.
///
/// # Errors
/// Returns the I/O error raised while binding `config.bind_addr`.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: build_http_state(&config),
        key: config.key,
        cookie_secure: config.cookie_secure,
        same_site: config.same_site,
    };
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

//! Loopback server and scenario state for the account behaviour tests.
//!
//! Actix spawns with `spawn_local`, so every async step is driven on one
//! current-thread runtime inside one `LocalSet`. Dropping the fixture stops
//! the server, including when a step panics.

use std::cell::RefCell;
use std::future::Future;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use account_service::Trace;
use account_service::domain::{
    EmailDomainPolicy, PasswordLoginService, RegistrationService, TRACE_ID_HEADER,
};
use account_service::inbound::http::auth::{check_auth, login, logout};
use account_service::inbound::http::json::json_config;
use account_service::inbound::http::state::HttpState;
use account_service::inbound::http::users::register;
use account_service::outbound::memory::InMemoryUserRepository;
use account_service::outbound::security::Argon2PasswordHasher;
use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::ServerHandle;
use actix_web::http::header::HeaderMap;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

/// Executor pair every async step runs on.
struct Executor {
    runtime: Runtime,
    local: LocalSet,
}

impl Executor {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        Self {
            runtime,
            local: LocalSet::new(),
        }
    }

    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.local.block_on(&self.runtime, fut)
    }
}

pub(crate) struct AccountWorld {
    executor: Executor,
    base_url: String,
    server: ServerHandle,
    repository: InMemoryUserRepository,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
    session_cookie: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<AccountWorld>>;

/// Owns the scenario world and stops its server on drop.
pub(crate) struct WorldFixture(SharedWorld);

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        Rc::clone(&self.0)
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.0.borrow();
        let server = ctx.server.clone();
        ctx.executor.block_on(async move { server.stop(true).await });
    }
}

/// Body sent with a request.
pub(crate) enum RequestBody {
    Json(Value),
    Raw {
        content_type: &'static str,
        payload: String,
    },
    Empty,
}

pub(crate) struct RequestSpec<'a> {
    pub(crate) method: Method,
    pub(crate) path: &'a str,
    pub(crate) body: RequestBody,
    pub(crate) label: &'a str,
}

/// What a step may assert on after a request.
struct Outcome {
    status: u16,
    trace_id: Option<String>,
    session_cookie: Option<String>,
    body: Option<Value>,
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

/// `name=value` part of the session `Set-Cookie` header, if one was sent.
fn session_pair(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("session="))
        .and_then(|value| value.split(';').next())
        .map(ToOwned::to_owned)
}

async fn send(base_url: String, cookie: Option<String>, spec: RequestSpec<'_>) -> Outcome {
    let RequestSpec {
        method,
        path,
        body,
        label,
    } = spec;
    let mut request = Client::default().request(method, format!("{base_url}{path}"));
    if let Some(cookie) = cookie {
        request = request.insert_header((header::COOKIE, cookie));
    }
    let sent = match body {
        RequestBody::Json(value) => request.send_json(&value).await,
        RequestBody::Raw {
            content_type,
            payload,
        } => {
            request
                .insert_header((header::CONTENT_TYPE, content_type))
                .send_body(payload)
                .await
        }
        RequestBody::Empty => request.send().await,
    };
    let mut response = sent.expect(label);
    let bytes = response.body().await.expect(label);
    Outcome {
        status: response.status().as_u16(),
        trace_id: header_text(response.headers(), TRACE_ID_HEADER),
        session_cookie: session_pair(response.headers()),
        body: (!bytes.is_empty()).then(|| serde_json::from_slice(&bytes).expect(label)),
    }
}

/// Send a request with the stored session cookie and record the outcome.
///
/// A new session cookie replaces the stored one; responses without one
/// leave it untouched.
pub(crate) fn perform_request(world: &SharedWorld, spec: RequestSpec<'_>) {
    let outcome = {
        let ctx = world.borrow();
        let pending = send(ctx.base_url.clone(), ctx.session_cookie.clone(), spec);
        ctx.executor.block_on(pending)
    };
    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(outcome.status);
    ctx.last_trace_id = outcome.trace_id;
    ctx.last_body = outcome.body;
    if outcome.session_cookie.is_some() {
        ctx.session_cookie = outcome.session_cookie;
    }
}

/// Number of accounts currently held by the in-memory store.
pub(crate) fn stored_user_count(world: &SharedWorld) -> usize {
    let ctx = world.borrow();
    ctx.executor.block_on(ctx.repository.len())
}

/// Services backed by `repository` with a cheap hash cost.
fn http_state(repository: &InMemoryUserRepository) -> HttpState {
    let repository = Arc::new(repository.clone());
    let hasher = Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1).expect("cheap params"));
    let registration = RegistrationService::new(
        Arc::clone(&repository),
        Arc::clone(&hasher),
        EmailDomainPolicy::default(),
    );
    let login_service = PasswordLoginService::new(repository, hasher);
    HttpState::new(Arc::new(registration), Arc::new(login_service))
}

/// Start the account routes on an ephemeral loopback port.
fn start_server(state: HttpState) -> std::io::Result<(String, ServerHandle)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let key = Key::generate();
    let state = web::Data::new(state);
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .cookie_same_site(SameSite::Lax)
            .cookie_content_security(CookieContentSecurity::Private)
            .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(2)))
            .build();
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .wrap(session)
            .wrap(Trace)
            .service(register)
            .service(login)
            .service(logout)
            .service(check_auth)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)?
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((base_url, handle))
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let executor = Executor::new();
    let repository = InMemoryUserRepository::new();
    let state = http_state(&repository);
    let (base_url, server) = executor
        .block_on(async { start_server(state) })
        .expect("server should start");

    WorldFixture(Rc::new(RefCell::new(AccountWorld {
        executor,
        base_url,
        server,
        repository,
        last_status: None,
        last_body: None,
        last_trace_id: None,
        session_cookie: None,
    })))
}

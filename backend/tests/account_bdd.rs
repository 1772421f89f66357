//! Behaviour tests for registration and session authentication.
//!
//! Each scenario runs against a real HTTP server bound to a loopback port,
//! with an in-memory user store the steps can inspect.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

#[path = "support/harness.rs"]
mod harness;

use actix_web::http::Method;
use harness::{
    RequestBody, RequestSpec, SharedWorld, WorldFixture, perform_request, stored_user_count,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

#[fixture]
fn world() -> WorldFixture {
    harness::world()
}

fn register(world: &SharedWorld, payload: Value) {
    perform_request(
        world,
        RequestSpec {
            method: Method::POST,
            path: "/register",
            body: RequestBody::Json(payload),
            label: "register request",
        },
    );
}

fn registration(name: &str, email: &str, password: &str) -> Value {
    json!({
        "name": name,
        "lastname": "Kaiser",
        "email": email,
        "password": password,
    })
}

fn last_body(world: &SharedWorld) -> Value {
    world.borrow().last_body.clone().expect("response body")
}

fn error_list(world: &SharedWorld) -> Vec<String> {
    last_body(world)
        .get("errors")
        .and_then(Value::as_array)
        .expect("errors array")
        .iter()
        .map(|value| value.as_str().expect("error message").to_owned())
        .collect()
}

#[given("a running account service")]
fn a_running_account_service(world: &WorldFixture) {
    let _ = world;
}

#[given("{email} is already registered")]
fn email_is_already_registered(world: &WorldFixture, email: String) {
    let shared = world.world();
    register(&shared, registration("Jakub", &email, "111111111111"));
    let mut ctx = shared.borrow_mut();
    assert_eq!(ctx.last_status, Some(200), "seed registration should succeed");
    ctx.last_status = None;
    ctx.last_body = None;
    ctx.last_trace_id = None;
}

#[when("a client registers {email} with password {password}")]
fn a_client_registers(world: &WorldFixture, email: String, password: String) {
    register(&world.world(), registration("Jakub", &email, &password));
}

#[when("a client registers with an empty name")]
fn a_client_registers_with_an_empty_name(world: &WorldFixture) {
    register(
        &world.world(),
        registration("", "kuba@acme.com", "111111111111"),
    );
}

#[when("a client registers with an empty name and password {password}")]
fn a_client_registers_with_an_empty_name_and_password(world: &WorldFixture, password: String) {
    register(&world.world(), registration("", "kuba@acme.com", &password));
}

#[when("a client posts an empty JSON body to {path}")]
fn a_client_posts_an_empty_json_body(world: &WorldFixture, path: String) {
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::POST,
            path: &path,
            body: RequestBody::Raw {
                content_type: "application/json",
                payload: String::new(),
            },
            label: "empty body request",
        },
    );
}

#[when("a client posts a form body to {path}")]
fn a_client_posts_a_form_body(world: &WorldFixture, path: String) {
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::POST,
            path: &path,
            body: RequestBody::Raw {
                content_type: "application/x-www-form-urlencoded",
                payload: "name=Jakub&lastname=Kaiser".to_owned(),
            },
            label: "form body request",
        },
    );
}

#[when("the client signs in as {email} with password {password}")]
fn the_client_signs_in(world: &WorldFixture, email: String, password: String) {
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::POST,
            path: "/login",
            body: RequestBody::Json(json!({ "email": email, "password": password })),
            label: "login request",
        },
    );
}

#[when("the client checks authentication")]
fn the_client_checks_authentication(world: &WorldFixture) {
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::GET,
            path: "/auth",
            body: RequestBody::Empty,
            label: "auth check request",
        },
    );
}

#[when("the client signs out")]
fn the_client_signs_out(world: &WorldFixture) {
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::POST,
            path: "/logout",
            body: RequestBody::Empty,
            label: "logout request",
        },
    );
    assert_eq!(world.world().borrow().last_status, Some(204));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    assert_eq!(world.world().borrow().last_status, Some(status));
}

#[then("the response describes user {id} without a password")]
fn the_response_describes_user(world: &WorldFixture, id: i64) {
    let body = last_body(&world.world());
    assert_eq!(
        body,
        json!({
            "id": id,
            "name": "Jakub",
            "lastname": "Kaiser",
            "email": "kuba@acme.com",
        })
    );
}

#[then("the response lists only the empty name error")]
fn the_response_lists_only_the_empty_name_error(world: &WorldFixture) {
    assert_eq!(error_list(&world.world()), ["name must not be empty"]);
}

#[then("the response lists the empty name and short password errors")]
fn the_response_lists_the_empty_name_and_short_password_errors(world: &WorldFixture) {
    assert_eq!(
        error_list(&world.world()),
        [
            "name must not be empty",
            "Password must be at least 12 characters long",
        ]
    );
}

#[then("the response lists the disallowed domain error")]
fn the_response_lists_the_disallowed_domain_error(world: &WorldFixture) {
    assert_eq!(
        error_list(&world.world()),
        ["email domain must be one of: acme.com"]
    );
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &WorldFixture, code: String) {
    let body = last_body(&world.world());
    assert_eq!(body.get("code").and_then(Value::as_str), Some(code.as_str()));
    if code == "user_exists" {
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("User exists")
        );
    }
}

#[then("the response carries a trace id")]
fn the_response_carries_a_trace_id(world: &WorldFixture) {
    let shared = world.world();
    let ctx = shared.borrow();
    let trace_id = ctx.last_trace_id.as_deref().expect("trace id header");
    let body = ctx.last_body.as_ref().expect("error body");
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(trace_id));
}

#[then("the user store holds {count} accounts")]
fn the_user_store_holds(world: &WorldFixture, count: usize) {
    assert_eq!(stored_user_count(&world.world()), count);
}

#[then("the principal email is {email}")]
fn the_principal_email_is(world: &WorldFixture, email: String) {
    let body = last_body(&world.world());
    assert_eq!(body.get("email").and_then(Value::as_str), Some(email.as_str()));
    assert!(body.get("id").and_then(Value::as_i64).is_some());
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "First registration receives identifier zero"
)]
fn first_registration_receives_identifier_zero(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Empty name is rejected"
)]
fn empty_name_is_rejected(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Every broken rule is reported in field order"
)]
fn every_broken_rule_is_reported_in_field_order(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Email outside the allowed domain is rejected"
)]
fn email_outside_the_allowed_domain_is_rejected(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Duplicate email is rejected and not stored twice"
)]
fn duplicate_email_is_rejected_and_not_stored_twice(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Empty body is rejected as an invalid request"
)]
fn empty_body_is_rejected_as_an_invalid_request(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Body without a JSON content type is rejected"
)]
fn body_without_a_json_content_type_is_rejected(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth.feature",
    name = "Signed-in user passes the authentication check"
)]
fn signed_in_user_passes_the_authentication_check(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth.feature",
    name = "Anonymous caller fails the authentication check"
)]
fn anonymous_caller_fails_the_authentication_check(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth.feature",
    name = "Wrong password is rejected"
)]
fn wrong_password_is_rejected(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth.feature",
    name = "Signing out ends the session"
)]
fn signing_out_ends_the_session(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth.feature",
    name = "Email casing is kept but ignored when signing in"
)]
fn email_casing_is_kept_but_ignored_when_signing_in(world: WorldFixture) {
    drop(world);
}

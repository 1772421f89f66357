//! OpenAPI description of the HTTP surface.
//!
//! Served at `/docs` in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::openapi::{Components, OpenApi as Document};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Principal, UserProfile};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::users::RegisterRequest;

/// Registers the `session` cookie as the API's security scheme.
struct SessionCookieScheme;

impl Modify for SessionCookieScheme {
    fn modify(&self, openapi: &mut Document) {
        let cookie = ApiKeyValue::with_description("session", "Issued by POST /login.");
        openapi
            .components
            .get_or_insert_with(Components::default)
            .add_security_scheme("SessionCookie", SecurityScheme::ApiKey(ApiKey::Cookie(cookie)));
    }
}

/// Generated OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieScheme),
    info(
        title = "Account service API",
        description = "Registration, cookie-session login and probes."
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::check_auth,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(RegisterRequest, LoginRequest, UserProfile, Principal, Error, ErrorCode)),
    tags(
        (name = "users", description = "Registration"),
        (name = "auth", description = "Sessions"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    #[fixture]
    fn doc() -> Document {
        ApiDoc::openapi()
    }

    fn property_names(doc: &Document, schema: &str) -> Vec<String> {
        let components = doc.components.as_ref().expect("components");
        match components.schemas.get(schema) {
            Some(RefOr::T(Schema::Object(object))) => object.properties.keys().cloned().collect(),
            _ => panic!("{schema} should be an inline object schema"),
        }
    }

    #[rstest]
    #[case("/register")]
    #[case("/login")]
    #[case("/logout")]
    #[case("/auth")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn documents_route(doc: Document, #[case] path: &str) {
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId", "errors"])]
    #[case("UserProfile", &["id", "name", "lastname", "email"])]
    #[case("RegisterRequest", &["name", "lastname", "email", "password"])]
    fn documents_schema_fields(doc: Document, #[case] schema: &str, #[case] fields: &[&str]) {
        let names = property_names(&doc, schema);
        for field in fields {
            assert!(names.iter().any(|name| name == field), "{schema} lacks {field}");
        }
    }

    #[rstest]
    fn profile_schema_omits_password(doc: Document) {
        assert!(!property_names(&doc, "UserProfile").contains(&"password".to_owned()));
    }

    #[rstest]
    fn declares_session_cookie_scheme(doc: Document) {
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}

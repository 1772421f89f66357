//! Session settings parsing in both build modes.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use uuid::Uuid;

/// Key file removed on drop.
struct KeyFile(PathBuf);

impl KeyFile {
    fn with_len(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("account-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![0x5a; len]).expect("write key file");
        Self(path)
    }

    fn location(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl Drop for KeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[fixture]
fn key_file() -> KeyFile {
    KeyFile::with_len(SESSION_KEY_MIN_LEN)
}

type Vars = HashMap<&'static str, String>;

fn production(key_path: String) -> Vars {
    Vars::from([
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn load(vars: Vars, mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    session_settings_from_env(&env, mode)
}

fn rejection(vars: Vars) -> SessionConfigError {
    match load(vars, BuildMode::Release) {
        Ok(_) => panic!("release settings should be rejected"),
        Err(err) => err,
    }
}

#[rstest]
fn complete_release_settings_load(key_file: KeyFile) {
    let settings = load(production(key_file.location()), BuildMode::Release).expect("valid");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_reports_unset_variable(key_file: KeyFile, #[case] unset: &'static str) {
    let mut vars = production(key_file.location());
    vars.remove(unset);
    assert!(matches!(rejection(vars), SessionConfigError::MissingEnv { name } if name == unset));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(COOKIE_SECURE_ENV, "")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "2")]
fn release_reports_unparsable_variable(
    key_file: KeyFile,
    #[case] variable: &'static str,
    #[case] value: &str,
) {
    let mut vars = production(key_file.location());
    vars.insert(variable, value.to_owned());
    assert!(matches!(
        rejection(vars),
        SessionConfigError::InvalidEnv { name, .. } if name == variable
    ));
}

#[rstest]
fn release_refuses_ephemeral_keys(key_file: KeyFile) {
    let mut vars = production(key_file.location());
    vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());
    assert!(matches!(rejection(vars), SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_refuses_same_site_none_over_plain_http(key_file: KeyFile) {
    let mut vars = production(key_file.location());
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    assert!(matches!(rejection(vars), SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_needs_a_readable_key_file() {
    let absent = std::env::temp_dir().join(format!("absent-{}", Uuid::new_v4()));
    let vars = production(absent.to_string_lossy().into_owned());
    assert!(matches!(rejection(vars), SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_needs_enough_key_material() {
    let short = KeyFile::with_len(32);
    assert!(matches!(
        rejection(production(short.location())),
        SessionConfigError::KeyTooShort { length: 32, min_len: SESSION_KEY_MIN_LEN, .. }
    ));
}

#[rstest]
fn debug_tolerates_an_empty_environment() {
    let settings = load(Vars::new(), BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("unexpected", SameSite::Lax)]
#[case("none", SameSite::None)]
fn debug_same_site_falls_back_or_warns(
    key_file: KeyFile,
    #[case] value: &str,
    #[case] expected: SameSite,
) {
    let mut vars = production(key_file.location());
    vars.insert(SAMESITE_ENV, value.to_owned());
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    let settings = load(vars, BuildMode::Debug).expect("debug is lenient");
    assert_eq!(settings.same_site, expected);
}

#[rstest]
#[case("1", Some(true))]
#[case(" Yes ", Some(true))]
#[case("n", Some(false))]
#[case("FALSE", Some(false))]
#[case("enabled", None)]
fn boolean_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}

#[rstest]
#[case("LAX", Some(SameSite::Lax))]
#[case(" strict", Some(SameSite::Strict))]
#[case("None", Some(SameSite::None))]
#[case("always", None)]
fn same_site_spellings(#[case] raw: &str, #[case] expected: Option<SameSite>) {
    assert_eq!(parse_same_site(raw), expected);
}

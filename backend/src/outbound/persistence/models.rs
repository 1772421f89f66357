//! Row types mapping the `users` table to Rust structs.

use diesel::prelude::*;

use super::schema::users;

/// Row read from `users`; `created_at` is left to the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
}

/// Insert payload for `users`; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub lastname: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

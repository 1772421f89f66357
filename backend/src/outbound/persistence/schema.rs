//! Diesel table definitions for the account store.
//!
//! Kept in sync with `backend/migrations` by hand.

diesel::table! {
    /// Registered accounts.
    ///
    /// `id` is an identity column starting at zero; `email` keeps the
    /// submitted casing and is unique through the `users_email_key` index on
    /// `lower(email)`.
    users (id) {
        id -> Int8,
        name -> Text,
        lastname -> Text,
        email -> Text,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

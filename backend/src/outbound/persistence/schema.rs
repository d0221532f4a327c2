//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts with credentials and any pending reset ticket.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        role -> Varchar,
        password_hash -> Text,
        reset_token_hash -> Nullable<Text>,
        reset_expires_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bootcamp listings. Location columns hold the geocoded address.
    bootcamps (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        slug -> Varchar,
        description -> Text,
        website -> Nullable<Text>,
        phone -> Nullable<Varchar>,
        email -> Nullable<Varchar>,
        longitude -> Float8,
        latitude -> Float8,
        formatted_address -> Text,
        street -> Text,
        city -> Text,
        state -> Text,
        zipcode -> Text,
        country -> Text,
        careers -> Array<Text>,
        housing -> Bool,
        job_assistance -> Bool,
        job_guarantee -> Bool,
        accept_gi -> Bool,
        average_cost -> Nullable<Int4>,
        average_rating -> Nullable<Float8>,
        photo -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Courses; rows are removed with their bootcamp.
    courses (id) {
        id -> Uuid,
        bootcamp_id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        description -> Text,
        weeks -> Varchar,
        tuition -> Int4,
        minimum_skill -> Varchar,
        scholarship_available -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews; unique per (bootcamp_id, user_id).
    reviews (id) {
        id -> Uuid,
        bootcamp_id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        text -> Text,
        rating -> Int2,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(courses -> bootcamps (bootcamp_id));
diesel::joinable!(reviews -> bootcamps (bootcamp_id));

diesel::allow_tables_to_appear_in_same_query!(bootcamps, courses, reviews, users);

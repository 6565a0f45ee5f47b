//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `migrations/` exactly;
//! Diesel uses them for compile-time query validation.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Given name.
        first_name -> Varchar,
        /// Family name.
        last_name -> Varchar,
        /// Unique contact address, stored lowercase.
        email -> Varchar,
        /// Encoded credential hash; never leaves the persistence layer.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogued books with their denormalised review aggregates.
    books (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Title as catalogued.
        title -> Varchar,
        /// Author as catalogued.
        author -> Varchar,
        /// Optional blurb.
        description -> Nullable<Text>,
        /// Genre label used for filtering.
        genre -> Varchar,
        /// Mean of active review ratings, rounded to two decimals; 0 when
        /// there are none. Written only by the review protocol.
        avg_rating -> Float8,
        /// Count of active reviews; never negative. Written only by the
        /// review protocol.
        total_reviews -> Int4,
        /// Soft-delete flag.
        is_deleted -> Bool,
        /// The cataloguing user.
        created_by -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Book reviews; soft-deleted rows are retained for resurrection.
    ///
    /// A partial unique index on `(book_id, user_id) WHERE NOT is_deleted`
    /// backstops the one-active-review invariant under concurrency.
    reviews (id) {
        /// Primary key: UUID v4 identifier, stable across soft-delete and
        /// resurrection.
        id -> Uuid,
        /// The reviewed book.
        book_id -> Uuid,
        /// The review's owner.
        user_id -> Uuid,
        /// Rating in [1, 5].
        rating -> Float8,
        /// Optional free-text comment.
        comment -> Nullable<Text>,
        /// Soft-delete flag; deleted rows are excluded from the aggregate.
        is_deleted -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(books -> users (created_by));
diesel::joinable!(reviews -> books (book_id));
diesel::joinable!(reviews -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, books, reviews);

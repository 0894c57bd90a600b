//! REST client for the clinic's document store.
//!
//! Every entity lives in its own collection and is addressed through the
//! PostgREST dialect: `GET /rest/v1/{collection}?field=eq.value`,
//! `POST` for inserts and `PATCH` for filtered updates.

pub mod query;
pub mod store;

pub use query::Query;
pub use store::DocumentStore;

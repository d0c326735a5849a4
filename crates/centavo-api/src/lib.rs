//! JSON REST API for Centavo.
//!
//! Exposes an axum [`Router`] backed by any
//! [`centavo_core::store::FinanceStore`]. Transport concerns (TLS, tracing
//! layers, the listener) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = centavo_api::api_router(store.clone());
//! ```

pub mod accounts;
pub mod banks;
pub mod error;
pub mod histories;
pub mod params;
pub mod provisions;
pub mod tags;

use std::sync::Arc;

use axum::{Router, routing::get};
use centavo_core::store::FinanceStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// Every entity gets the same route set: count, paginated list with
/// substring search, get-by-id, create, full-replace update, soft delete.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FinanceStore + 'static,
{
  Router::new()
    // Banks
    .route("/banks/count", get(banks::count::<S>))
    .route("/banks", get(banks::list::<S>).post(banks::create::<S>))
    .route(
      "/banks/{id}",
      get(banks::get_one::<S>)
        .put(banks::update::<S>)
        .delete(banks::delete::<S>),
    )
    // Accounts
    .route("/accounts/count", get(accounts::count::<S>))
    .route(
      "/accounts",
      get(accounts::list::<S>).post(accounts::create::<S>),
    )
    .route(
      "/accounts/{id}",
      get(accounts::get_one::<S>)
        .put(accounts::update::<S>)
        .delete(accounts::delete::<S>),
    )
    // Histories
    .route("/histories/count", get(histories::count::<S>))
    .route(
      "/histories",
      get(histories::list::<S>).post(histories::create::<S>),
    )
    .route(
      "/histories/{id}",
      get(histories::get_one::<S>)
        .put(histories::update::<S>)
        .delete(histories::delete::<S>),
    )
    // Provisions
    .route("/provisions/count", get(provisions::count::<S>))
    .route(
      "/provisions",
      get(provisions::list::<S>).post(provisions::create::<S>),
    )
    .route(
      "/provisions/{id}",
      get(provisions::get_one::<S>)
        .put(provisions::update::<S>)
        .delete(provisions::delete::<S>),
    )
    // Tags
    .route("/tags/count", get(tags::count::<S>))
    .route("/tags", get(tags::list::<S>).post(tags::create::<S>))
    .route(
      "/tags/{id}",
      get(tags::get_one::<S>)
        .put(tags::update::<S>)
        .delete(tags::delete::<S>),
    )
    .with_state(store)
}

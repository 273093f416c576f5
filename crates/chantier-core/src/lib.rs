//! chantier-core: the project/stage/task aggregate, its progress engine,
//! the reducer-style project store, and the two read-side projections.
//!
//! # Conventions
//!
//! - **Errors**: store operations return `Result<_, StoreError>`; lookup
//!   failures leave the snapshot untouched.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Purity**: the progress engine and projections never mutate their
//!   inputs; all mutation funnels through `store::transition`.

pub mod error;
pub mod model;
pub mod progress;
pub mod projection;
pub mod store;

pub use error::StoreError;
pub use store::{Action, ProjectStore, StoreState};

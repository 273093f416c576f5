//! Read-side projections over a store snapshot.
//!
//! Both views derive everything from the same snapshot and never mutate
//! entities; the board's drop gesture is translated into a single store
//! action by the caller.

pub mod board;
pub mod timeline;

pub use board::{Board, BoardCard, BoardColumn, build_board, bucket_for, drop_action};
pub use timeline::{TimelineEntry, build_timeline, derived_progress};

//! Survey operations. Each takes the caller as an explicit [`Viewer`]
//! (and `now` where time matters) and returns `Result<_, AppError>`.
//!
//! [`Viewer`]: crate::auth::session::Viewer

pub mod catalog;
pub mod collector;
pub mod publisher;
pub mod reader;
pub mod rules;
pub mod slug;
pub mod templates;

//! Service layer — one handler per user action.

pub mod clean;
pub mod insight;

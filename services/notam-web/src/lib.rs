//! NOTAM board web service library.
//!
//! Exposes the internal modules for testing purposes.

pub mod handlers;
pub mod page;
pub mod render_jobs;
pub mod state;

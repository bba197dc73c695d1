//! Shared types for the NOTAM board services.
//!
//! Defines the day key, the NOTAM record model, the fixed-width coordinate
//! parser, and the validation error taxonomy shared by the store, the
//! renderer, and the web service.

pub mod day;
pub mod error;
pub mod notam;
pub mod parse;

pub use day::DayKey;
pub use error::{FieldName, ValidationError};
pub use notam::{Notam, RawNotam};
pub use parse::parse_fields;

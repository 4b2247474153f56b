//! Event field validation
//!
//! CRUD letters are strict; event names and levels only produce warnings.

mod types;

pub use types::{
    validate_crud, validate_event_name, validate_level, STANDARD_CRUD, STANDARD_LEVELS,
};

//! Standard CRUD letters and education levels with validation

use crate::types::{LEVEL_OTHER, LEVEL_PARTICIPATING, LEVEL_TEACHING};

/// Allowed CRUD letters: create, read, update, delete
pub const STANDARD_CRUD: &[char] = &['c', 'r', 'u', 'd'];

/// Education levels the host knows how to report on
pub const STANDARD_LEVELS: &[u8] = &[LEVEL_OTHER, LEVEL_TEACHING, LEVEL_PARTICIPATING];

/// Check the CRUD letter, return an error message if it is not standard
pub fn validate_crud(crud: char) -> Option<String> {
    if STANDARD_CRUD.contains(&crud) {
        None
    } else {
        Some(format!(
            "Invalid crud '{}'. Expected one of {:?}",
            crud, STANDARD_CRUD
        ))
    }
}

/// Check the level, return a warning if it is not standard
pub fn validate_level(level: u8) -> Option<String> {
    if STANDARD_LEVELS.contains(&level) {
        None
    } else {
        Some(format!(
            "Non-standard level {}. Recommended: {:?}",
            level, STANDARD_LEVELS
        ))
    }
}

/// Check that a name looks like `\component\event\name`, return a warning if not
pub fn validate_event_name(name: &str) -> Option<String> {
    let parts: Vec<&str> = name.split('\\').collect();
    let canonical = parts.len() == 4
        && parts[0].is_empty()
        && parts[2] == "event"
        && !parts[1].is_empty()
        && !parts[3].is_empty();
    if canonical {
        None
    } else {
        Some(format!(
            "Non-canonical event name '{}'. Expected \\component\\event\\name",
            name
        ))
    }
}

//! Host supplied context values
//!
//! Neither type is constructed by the dispatcher itself; the host builds them
//! per request and hands them in.

use serde::{Deserialize, Serialize};

use super::event::SYSTEM_CONTEXT_ID;

/// Origin recorded when no network peer is involved
pub const CLI_ORIGIN: &str = "cli";

/// Opaque authorization scope a reader checks before exposing its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessContext {
    id: u64,
}

impl AccessContext {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    /// The system-wide context
    pub fn system() -> Self {
        Self::new(SYSTEM_CONTEXT_ID)
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Per-request facts stamped onto stored events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Network origin of the caller (IP address, or `cli`)
    pub origin: String,
    /// Real user when the session is "logged in as" someone else
    pub real_user_id: Option<u64>,
}

impl RequestContext {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            real_user_id: None,
        }
    }

    /// Mark the session as impersonated by `real_user_id`
    pub fn logged_in_as(mut self, real_user_id: u64) -> Self {
        self.real_user_id = Some(real_user_id);
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(CLI_ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_impersonation() {
        let ctx = RequestContext::new("192.168.1.5");
        assert_eq!(ctx.real_user_id, None);

        let ctx = ctx.logged_in_as(2);
        assert_eq!(ctx.real_user_id, Some(2));
        assert_eq!(ctx.origin, "192.168.1.5");
    }

    #[test]
    fn test_default_request_is_cli() {
        assert_eq!(RequestContext::default().origin, CLI_ORIGIN);
        assert_eq!(AccessContext::system().id(), SYSTEM_CONTEXT_ID);
    }
}

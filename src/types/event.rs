//! Event types for the log pipeline
//!
//! An [`Event`] is an immutable record of something that happened in the host
//! application. Stores receive it by reference, project it onto rows with
//! [`Event::get_data`], and rebuild it from rows with [`Event::restore`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{LogError, LogResult, Row};
use crate::validation::{validate_crud, validate_event_name, validate_level};

/// Education level: anything that is neither teaching nor participating
pub const LEVEL_OTHER: u8 = 0;
/// Education level: teacher-side actions
pub const LEVEL_TEACHING: u8 = 1;
/// Education level: learner-side actions
pub const LEVEL_PARTICIPATING: u8 = 2;

/// Context id of the system context, used when the host does not set one
pub const SYSTEM_CONTEXT_ID: u64 = 1;

/// Storage-only metadata attached to events read back from a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Row id assigned by the record store
    pub id: u64,
    /// Network origin of the request that logged the event
    pub origin: String,
    /// Real user behind a "logged in as" session
    pub real_user_id: Option<u64>,
}

/// An immutable event
///
/// Serialized field names match the storage columns so that a row and an
/// event share one shape. Deserialized events pass the same checks as
/// [`EventBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    #[serde(rename = "eventname")]
    event_name: String,
    component: String,
    action: String,
    target: String,
    crud: char,
    level: u8,
    #[serde(rename = "contextid")]
    context_id: u64,
    #[serde(rename = "userid")]
    user_id: u64,
    #[serde(rename = "relateduserid")]
    related_user_id: Option<u64>,
    #[serde(default)]
    other: Map<String, Value>,
    #[serde(rename = "timecreated")]
    time_created: i64,
    #[serde(skip)]
    provenance: Option<Provenance>,
}

/// Wire shape of an [`Event`] before validation
#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "eventname")]
    event_name: String,
    component: String,
    action: String,
    target: String,
    crud: char,
    level: u8,
    #[serde(rename = "contextid")]
    context_id: u64,
    #[serde(rename = "userid")]
    user_id: u64,
    #[serde(rename = "relateduserid")]
    related_user_id: Option<u64>,
    #[serde(default)]
    other: Map<String, Value>,
    #[serde(rename = "timecreated")]
    time_created: i64,
}

impl TryFrom<RawEvent> for Event {
    type Error = LogError;

    fn try_from(raw: RawEvent) -> LogResult<Self> {
        let event = Event {
            event_name: raw.event_name,
            component: raw.component,
            action: raw.action,
            target: raw.target,
            crud: raw.crud,
            level: raw.level,
            context_id: raw.context_id,
            user_id: raw.user_id,
            related_user_id: raw.related_user_id,
            other: raw.other,
            time_created: raw.time_created,
            provenance: None,
        };
        check_event(&event)?;
        Ok(event)
    }
}

/// Reject an empty name or an unknown CRUD letter; log softer problems
fn check_event(event: &Event) -> LogResult<()> {
    if event.event_name.trim().is_empty() {
        return Err(LogError::InvalidEvent("event name is empty".to_string()));
    }
    if let Some(msg) = validate_crud(event.crud) {
        return Err(LogError::InvalidEvent(msg));
    }
    for warning in [
        validate_event_name(&event.event_name),
        validate_level(event.level),
    ]
    .into_iter()
    .flatten()
    {
        tracing::debug!(event = %event.event_name, "{}", warning);
    }
    Ok(())
}

impl Event {
    /// Start building an event with the given fully qualified name
    pub fn builder(event_name: impl Into<String>) -> EventBuilder {
        EventBuilder::new(event_name.into())
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn crud(&self) -> char {
        self.crud
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn context_id(&self) -> u64 {
        self.context_id
    }

    /// The actor that triggered the event
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn related_user_id(&self) -> Option<u64> {
        self.related_user_id
    }

    /// Free-form payload
    pub fn other(&self) -> &Map<String, Value> {
        &self.other
    }

    /// Unix timestamp in seconds
    pub fn time_created(&self) -> i64 {
        self.time_created
    }

    /// Storage metadata, present only on events returned by a reader
    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// Project the public fields onto a storage row
    pub fn get_data(&self) -> Row {
        let mut row = Row::new();
        row.insert("eventname".to_string(), json!(self.event_name));
        row.insert("component".to_string(), json!(self.component));
        row.insert("action".to_string(), json!(self.action));
        row.insert("target".to_string(), json!(self.target));
        row.insert("crud".to_string(), json!(self.crud.to_string()));
        row.insert("level".to_string(), json!(self.level));
        row.insert("contextid".to_string(), json!(self.context_id));
        row.insert("userid".to_string(), json!(self.user_id));
        row.insert("relateduserid".to_string(), json!(self.related_user_id));
        row.insert("other".to_string(), Value::Object(self.other.clone()));
        row.insert("timecreated".to_string(), json!(self.time_created));
        row
    }

    /// Rebuild an event from a row produced by [`Event::get_data`]
    ///
    /// Columns that are not part of the public field set are ignored; the
    /// caller strips storage columns into `provenance` beforehand. Rows that
    /// would fail [`EventBuilder::build`] are rejected.
    pub fn restore(row: Row, provenance: Provenance) -> LogResult<Self> {
        let mut event: Event = serde_json::from_value(Value::Object(row))
            .map_err(|e| LogError::InvalidEvent(format!("cannot restore event: {}", e)))?;
        event.provenance = Some(provenance);
        Ok(event)
    }

    /// Serialize event to JSON string (for JSONL)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize event from JSON string
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Builder for [`Event`]
///
/// Component, target and action default to the parts of a canonical name
/// such as `\core\event\user_loggedin` (component `core`, target `user`,
/// action `loggedin`).
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    fn new(event_name: String) -> Self {
        let (component, target, action) = split_event_name(&event_name);
        Self {
            event: Event {
                event_name,
                component,
                action,
                target,
                crud: 'r',
                level: LEVEL_OTHER,
                context_id: SYSTEM_CONTEXT_ID,
                user_id: 0,
                related_user_id: None,
                other: Map::new(),
                time_created: crate::utils::current_timestamp(),
                provenance: None,
            },
        }
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.event.component = component.into();
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.event.action = action.into();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.event.target = target.into();
        self
    }

    /// One of `c`, `r`, `u`, `d`
    pub fn crud(mut self, crud: char) -> Self {
        self.event.crud = crud;
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.event.level = level;
        self
    }

    pub fn context_id(mut self, context_id: u64) -> Self {
        self.event.context_id = context_id;
        self
    }

    pub fn user_id(mut self, user_id: u64) -> Self {
        self.event.user_id = user_id;
        self
    }

    pub fn related_user_id(mut self, related_user_id: u64) -> Self {
        self.event.related_user_id = Some(related_user_id);
        self
    }

    pub fn other(mut self, other: Map<String, Value>) -> Self {
        self.event.other = other;
        self
    }

    /// Insert a single payload entry
    pub fn other_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.event.other.insert(key.into(), value);
        self
    }

    pub fn time_created(mut self, time_created: i64) -> Self {
        self.event.time_created = time_created;
        self
    }

    /// Validate and freeze the event
    ///
    /// An empty name or an unknown CRUD letter is rejected. Non-canonical
    /// names and unusual levels are accepted with a debug diagnostic.
    pub fn build(self) -> LogResult<Event> {
        check_event(&self.event)?;
        Ok(self.event)
    }
}

/// Split `\component\event\target_action` into its parts
fn split_event_name(name: &str) -> (String, String, String) {
    let parts: Vec<&str> = name.trim_start_matches('\\').split('\\').collect();
    let (component, class) = match parts.as_slice() {
        [component, _, class] => (component.to_string(), *class),
        _ => ("core".to_string(), parts.last().copied().unwrap_or_default()),
    };
    match class.split_once('_') {
        Some((target, action)) => (component, target.to_string(), action.to_string()),
        None => (component, class.to_string(), String::new()),
    }
}

//! Queue adapters for the notification boundary.
//!
//! Real delivery to plugins lives outside this crate. These adapters cover
//! logging and in-process collection.

use crate::notification::NotificationMessage;
use crate::ports::NotificationQueue;
use parking_lot::RwLock;
use tracing::{debug, info, Level};

/// A queue that logs each posted message using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingNotificationQueue {
    /// The log level to use.
    level: Level,
}

impl Default for LoggingNotificationQueue {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingNotificationQueue {
    /// Creates a new logging queue with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging queue.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_message(&self, message: &NotificationMessage) {
        let summary = message.request_data.as_stage_status();
        let pipeline = summary.map_or("", |s| s.pipeline_name.as_str());
        let stage = summary.map_or("", |s| s.stage_name.as_str());

        if self.level == Level::DEBUG {
            debug!(
                request_name = %message.request_name,
                pipeline_name = pipeline,
                stage_name = stage,
                "Notification posted"
            );
        } else {
            info!(
                request_name = %message.request_name,
                pipeline_name = pipeline,
                stage_name = stage,
                "Notification posted"
            );
        }

        debug!(
            request_name = %message.request_name,
            request_data = %masked_payload(message),
            "Notification payload"
        );
    }
}

/// Value written in place of credentials.
const MASK: &str = "********";

/// Renders the message with every `password` field masked.
fn masked_payload(message: &NotificationMessage) -> String {
    match message.to_json() {
        Ok(mut value) => {
            mask_passwords(&mut value);
            value.to_string()
        }
        Err(e) => format!("<unserializable: {e}>"),
    }
}

fn mask_passwords(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key == "password" {
                    *field = serde_json::Value::String(MASK.to_string());
                } else {
                    mask_passwords(field);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(mask_passwords),
        _ => {}
    }
}

impl NotificationQueue for LoggingNotificationQueue {
    fn post(&self, message: NotificationMessage) {
        self.log_message(&message);
    }
}

/// A queue that keeps every posted message in memory.
#[derive(Debug, Default)]
pub struct CollectingNotificationQueue {
    messages: RwLock<Vec<NotificationMessage>>,
}

impl CollectingNotificationQueue {
    /// Creates a new collecting queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all posted messages in post order.
    #[must_use]
    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.messages.read().clone()
    }

    /// Returns the number of posted messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// Returns true if nothing was posted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// Removes and returns all posted messages.
    pub fn drain(&self) -> Vec<NotificationMessage> {
        std::mem::take(&mut *self.messages.write())
    }

    /// Returns messages of one notification kind.
    #[must_use]
    pub fn messages_named(&self, request_name: &str) -> Vec<NotificationMessage> {
        self.messages
            .read()
            .iter()
            .filter(|m| m.request_name.as_str() == request_name)
            .cloned()
            .collect()
    }
}

impl NotificationQueue for CollectingNotificationQueue {
    fn post(&self, message: NotificationMessage) {
        self.messages.write().push(message);
    }
}

//! Delivery events — shared between the scheduling engine and host adapters.
//!
//! One event stream, three shapes, all routed through the engine's single
//! result channel. The serialized form keeps the wire vocabulary consumers
//! already speak: `{"type":"set",...}`, `{"type":"wakeup",...}`,
//! `{"type":"stopped",...}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A result produced by the engine and delivered to the attached consumer
/// (or buffered in the single pending slot while nobody is attached).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WakeupEvent {
    /// A trigger was registered with the alarm-firing primitive.
    /// Emitted once per registration during a scheduling pass.
    #[serde(rename = "set")]
    Scheduled {
        /// Alarm kind as stored: `"onetime"` or `"daylist"`.
        alarm_type: String,
        /// Resolved trigger instant, milliseconds since the Unix epoch.
        alarm_date: i64,
    },

    /// The alarm-firing primitive fired; `extra` is the opaque payload the
    /// alarm was registered with, if any.
    Wakeup {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extra: Option<Value>,
    },

    /// The in-progress wakeup-handling session was halted.
    Stopped {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extra: Option<Value>,
    },
}

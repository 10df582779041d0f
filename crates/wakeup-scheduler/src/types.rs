use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recurrence shape of an alarm spec.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlarmKind {
    /// Fire once at the next occurrence of the time-of-day.
    #[default]
    OneTime,

    /// Fire weekly, once per listed weekday.
    DayList,

    /// Anything else on the wire, preserved verbatim so saving the list back
    /// stays lossless. Unrecognized kinds are skipped during a scheduling
    /// pass rather than rejected.
    Unknown(String),
}

impl AlarmKind {
    pub fn as_str(&self) -> &str {
        match self {
            AlarmKind::OneTime => "onetime",
            AlarmKind::DayList => "daylist",
            AlarmKind::Unknown(other) => other,
        }
    }
}

impl From<String> for AlarmKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "onetime" => AlarmKind::OneTime,
            "daylist" => AlarmKind::DayList,
            _ => AlarmKind::Unknown(s),
        }
    }
}

impl From<AlarmKind> for String {
    fn from(kind: AlarmKind) -> Self {
        match kind {
            AlarmKind::Unknown(other) => other,
            recognized => recognized.as_str().to_string(),
        }
    }
}

/// Wall-clock time of day. An absent `hour` makes the spec unresolvable;
/// such entries are skipped, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default)]
    pub minute: u32,
}

/// Day of the week, zero-based from Sunday in identifier arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// Weekday index with Sunday = 0 … Saturday = 6.
    pub fn index(self) -> u32 {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "sunday",
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
        }
    }
}

/// One entry in the persisted alarm list.
///
/// Serialized structurally with the wire vocabulary hosts already use:
/// `{"type":"daylist","time":{"hour":6,"minute":0},"days":["monday"]}`.
/// A missing `type` defaults to `onetime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmSpec {
    #[serde(rename = "type", default)]
    pub kind: AlarmKind,

    /// Required for recognized kinds; its inner `hour` may still be absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOfDay>,

    /// Required for `daylist`; an empty list is legal and resolves to
    /// zero triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<DayOfWeek>>,

    /// Opaque payload carried through to the fired event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

/// Payload registered with the alarm-firing primitive and handed back on fire.
///
/// Daylist registrations carry their originating time-of-day and weekday so
/// the fire handler knows which occurrence went off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerPayload {
    #[serde(rename = "type")]
    pub kind: AlarmKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<DayOfWeek>,
}

/// Persisted playback options written by `configure`.
///
/// Every field is independently present-or-absent; on each `configure` call
/// a present field replaces the stored value and an absent field clears it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_only_wifi: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ringtone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults_to_onetime() {
        let spec: AlarmSpec = serde_json::from_str(r#"{"time":{"hour":7}}"#).unwrap();
        assert_eq!(spec.kind, AlarmKind::OneTime);
        assert_eq!(spec.time.unwrap().hour, Some(7));
        assert_eq!(spec.time.unwrap().minute, 0);
    }

    #[test]
    fn unrecognized_kind_parses_as_unknown() {
        let spec: AlarmSpec = serde_json::from_str(r#"{"type":"cron"}"#).unwrap();
        assert_eq!(spec.kind, AlarmKind::Unknown("cron".to_string()));
    }

    #[test]
    fn unrecognized_kind_survives_a_round_trip() {
        let spec: AlarmSpec = serde_json::from_str(r#"{"type":"cron"}"#).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains(r#""type":"cron""#));
        let back: AlarmSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn daylist_round_trip() {
        let json = r#"{"type":"daylist","time":{"hour":6,"minute":0},"days":["monday","friday"]}"#;
        let spec: AlarmSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.kind, AlarmKind::DayList);
        assert_eq!(
            spec.days,
            Some(vec![DayOfWeek::Monday, DayOfWeek::Friday])
        );
        let back: AlarmSpec =
            serde_json::from_str(&serde_json::to_string(&spec).unwrap()).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn unknown_weekday_is_rejected() {
        let json = r#"{"type":"daylist","time":{"hour":6},"days":["funday"]}"#;
        assert!(serde_json::from_str::<AlarmSpec>(json).is_err());
    }

    #[test]
    fn options_use_camel_case_keys() {
        let opts: AlarmOptions =
            serde_json::from_str(r#"{"streamingUrl":"http://radio","streamingOnlyWifi":true}"#)
                .unwrap();
        assert_eq!(opts.streaming_url.as_deref(), Some("http://radio"));
        assert_eq!(opts.streaming_only_wifi, Some(true));
        assert_eq!(opts.volume, None);
    }
}

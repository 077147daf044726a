use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How an event sells its tickets. Seated events bind reserves to
/// physical venue sections; the other two sell against reserve
/// counters alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Online,
    InPersonNonSeated,
    InPersonSeated,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Online => "online",
            EventType::InPersonNonSeated => "inpersonNonSeated",
            EventType::InPersonSeated => "inpersonSeated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "online" => Some(EventType::Online),
            "inpersonNonSeated" => Some(EventType::InPersonNonSeated),
            "inpersonSeated" => Some(EventType::InPersonSeated),
            _ => None,
        }
    }
}

/// Catalog row for an event listing. Owned by the excluded event
/// management service; the engine reads it and flips `cancelled`
/// during host-driven event cancellation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub event_id: i64,
    pub host_id: i64,
    pub title: String,
    pub event_type: String,
    pub venue_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub cancelled: bool,
}

impl Event {
    pub fn kind(&self) -> Option<EventType> {
        EventType::parse(&self.event_type)
    }

    pub fn is_seated(&self) -> bool {
        self.kind() == Some(EventType::InPersonSeated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_parse() {
        assert_eq!(EventType::parse("online"), Some(EventType::Online));
        assert_eq!(
            EventType::parse("inpersonNonSeated"),
            Some(EventType::InPersonNonSeated)
        );
        assert_eq!(
            EventType::parse("inpersonSeated"),
            Some(EventType::InPersonSeated)
        );
        assert_eq!(EventType::parse("hybrid"), None);
    }

    #[test]
    fn test_event_type_as_str_round_trip() {
        for kind in [
            EventType::Online,
            EventType::InPersonNonSeated,
            EventType::InPersonSeated,
        ] {
            assert_eq!(EventType::parse(kind.as_str()), Some(kind));
        }
    }
}

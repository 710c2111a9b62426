//! Claims records: medical events and chronic/behavioral-health diagnoses.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::id::MemberId;

/// Kind of medical encounter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum EventType {
    #[serde(rename = "Admission")]
    Admission,
    #[serde(rename = "ED Visit")]
    EdVisit,
    #[serde(rename = "PCP Visit")]
    PcpVisit,
}

impl EventType {
    /// All event types in reporting order.
    pub const ALL: [EventType; 3] = [EventType::Admission, EventType::EdVisit, EventType::PcpVisit];

    /// Label used in the source data and in every output.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Admission => "Admission",
            EventType::EdVisit => "ED Visit",
            EventType::PcpVisit => "PCP Visit",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an event type label is not one of the known encounters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventType(pub String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized event type '{}'", self.0)
    }
}

impl std::error::Error for UnknownEventType {}

impl FromStr for EventType {
    type Err = UnknownEventType;

    /// Case-insensitive; `_` and `-` are read as spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        match normalized.as_str() {
            "admission" => Ok(EventType::Admission),
            "ed visit" => Ok(EventType::EdVisit),
            "pcp visit" => Ok(EventType::PcpVisit),
            _ => Err(UnknownEventType(s.to_string())),
        }
    }
}

/// A single medical encounter. `end_date >= start_date` holds for every
/// event produced by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    pub member_id: MemberId,
    pub event_type: EventType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Event {
    pub fn new(
        member_id: impl Into<MemberId>,
        event_type: EventType,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            event_type,
            start_date,
            end_date,
        }
    }

    /// Length of stay in calendar days (0 for same-day encounters).
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// A chronic or behavioral-health diagnosis for a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnosis {
    pub member_id: MemberId,
    pub disease_group: String,
    pub diagnosis_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_source_labels() {
        assert_eq!("Admission".parse::<EventType>(), Ok(EventType::Admission));
        assert_eq!("ED Visit".parse::<EventType>(), Ok(EventType::EdVisit));
        assert_eq!("PCP Visit".parse::<EventType>(), Ok(EventType::PcpVisit));
    }

    #[test]
    fn parsing_is_lenient_about_case_and_separators() {
        assert_eq!("ed_visit".parse::<EventType>(), Ok(EventType::EdVisit));
        assert_eq!(" PCP-VISIT ".parse::<EventType>(), Ok(EventType::PcpVisit));
        assert_eq!("ED  Visit".parse::<EventType>(), Ok(EventType::EdVisit));
    }

    #[test]
    fn rejects_unknown_labels() {
        let err = "Telehealth".parse::<EventType>().unwrap_err();
        assert_eq!(err.0, "Telehealth");
        assert!(err.to_string().contains("Telehealth"));
    }

    #[test]
    fn serializes_with_source_labels() {
        let json = serde_json::to_string(&EventType::EdVisit).unwrap();
        assert_eq!(json, "\"ED Visit\"");
    }

    #[test]
    fn duration_counts_calendar_days() {
        let e = Event::new("m1", EventType::Admission, d(2020, 1, 30), d(2020, 2, 2));
        assert_eq!(e.duration_days(), 3);
        let same_day = Event::new("m1", EventType::EdVisit, d(2020, 1, 30), d(2020, 1, 30));
        assert_eq!(same_day.duration_days(), 0);
    }
}

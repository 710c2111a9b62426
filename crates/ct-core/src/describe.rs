//! Descriptive analytics over the loaded extracts.
//!
//! Computed before eligibility, over every loaded member. Percentages are
//! in [0, 100] and empty inputs produce zeroed rows rather than NaN.

use std::collections::BTreeSet;

use ct_common::{Diagnosis, Event, EventType, MemberId};
use ct_math::{frequency_table, percentage, round_to, Summary};
use serde::Serialize;

const PERCENT_PLACES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTypeShare {
    pub event_type: EventType,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub event_type: EventType,
    /// `None` when there are no events of this type.
    pub days: Option<Summary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseFrequency {
    pub disease_group: String,
    pub members: usize,
    /// Share of all members with at least one diagnosis.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recurrence {
    pub event_type: EventType,
    pub members_with_event: usize,
    /// Members with two or more events of this type.
    pub recurrent_members: usize,
    pub recurrence_percent: f64,
    pub mean_events_per_member: f64,
}

/// Everything `describe` reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveReport {
    pub total_events: usize,
    pub total_members: usize,
    pub diagnosed_members: usize,
    pub event_types: Vec<EventTypeShare>,
    pub durations: Vec<DurationStats>,
    pub diseases: Vec<DiseaseFrequency>,
    pub recurrence: Vec<Recurrence>,
}

impl DescriptiveReport {
    pub fn build(events: &[Event], diagnoses: &[Diagnosis]) -> Self {
        let total_members = events
            .iter()
            .map(|e| &e.member_id)
            .collect::<BTreeSet<_>>()
            .len();
        let (diagnosed_members, diseases) = disease_frequency(diagnoses);
        Self {
            total_events: events.len(),
            total_members,
            diagnosed_members,
            event_types: event_type_distribution(events),
            durations: visit_durations(events),
            diseases,
            recurrence: recurrence(events),
        }
    }
}

/// Count and share of each event type. Every type gets a row.
pub fn event_type_distribution(events: &[Event]) -> Vec<EventTypeShare> {
    EventType::ALL
        .iter()
        .map(|&event_type| {
            let count = events.iter().filter(|e| e.event_type == event_type).count();
            EventTypeShare {
                event_type,
                count,
                percent: round_to(percentage(count, events.len()), PERCENT_PLACES),
            }
        })
        .collect()
}

/// Duration in days per event type.
pub fn visit_durations(events: &[Event]) -> Vec<DurationStats> {
    EventType::ALL
        .iter()
        .map(|&event_type| {
            let days: Vec<i64> = events
                .iter()
                .filter(|e| e.event_type == event_type)
                .map(Event::duration_days)
                .collect();
            DurationStats {
                event_type,
                days: Summary::of(&days),
            }
        })
        .collect()
}

/// Distinct members per disease group, with the number of diagnosed members.
///
/// Ordered by member count descending, then disease group.
pub fn disease_frequency(diagnoses: &[Diagnosis]) -> (usize, Vec<DiseaseFrequency>) {
    let pairs: BTreeSet<(&str, &MemberId)> = diagnoses
        .iter()
        .map(|dx| (dx.disease_group.as_str(), &dx.member_id))
        .collect();
    let diagnosed = pairs
        .iter()
        .map(|(_, member)| *member)
        .collect::<BTreeSet<_>>()
        .len();

    let rows = frequency_table(pairs.iter().map(|(group, _)| *group))
        .into_iter()
        .map(|row| DiseaseFrequency {
            disease_group: row.key.to_string(),
            members: row.count,
            percent: round_to(percentage(row.count, diagnosed), PERCENT_PLACES),
        })
        .collect();
    (diagnosed, rows)
}

/// How often members come back for the same kind of encounter.
pub fn recurrence(events: &[Event]) -> Vec<Recurrence> {
    EventType::ALL
        .iter()
        .map(|&event_type| {
            let per_member = frequency_table(
                events
                    .iter()
                    .filter(|e| e.event_type == event_type)
                    .map(|e| &e.member_id),
            );
            let members_with_event = per_member.len();
            let recurrent_members = per_member.iter().filter(|row| row.count >= 2).count();
            let total: usize = per_member.iter().map(|row| row.count).sum();
            let mean_events_per_member = if members_with_event == 0 {
                0.0
            } else {
                round_to(total as f64 / members_with_event as f64, PERCENT_PLACES)
            };
            Recurrence {
                event_type,
                members_with_event,
                recurrent_members,
                recurrence_percent: round_to(
                    percentage(recurrent_members, members_with_event),
                    PERCENT_PLACES,
                ),
                mean_events_per_member,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 3, day).unwrap()
    }

    fn sample_events() -> Vec<Event> {
        vec![
            Event::new("A", EventType::EdVisit, d(1), d(1)),
            Event::new("A", EventType::EdVisit, d(5), d(5)),
            Event::new("B", EventType::EdVisit, d(2), d(2)),
            Event::new("B", EventType::Admission, d(3), d(7)),
            Event::new("C", EventType::Admission, d(10), d(12)),
            Event::new("C", EventType::Admission, d(20), d(21)),
        ]
    }

    #[test]
    fn distribution_covers_every_type() {
        let rows = event_type_distribution(&sample_events());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].event_type, EventType::Admission);
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[0].percent, 50.0);
        assert_eq!(rows[2].count, 0);
        assert_eq!(rows[2].percent, 0.0);
    }

    #[test]
    fn admission_durations() {
        let rows = visit_durations(&sample_events());
        let adm = rows[0].days.as_ref().unwrap();
        assert_eq!(adm.count, 3);
        assert_eq!(adm.min, 1);
        assert_eq!(adm.max, 4);
        assert_eq!(adm.median, 2.0);
        assert!(rows[2].days.is_none());
    }

    #[test]
    fn disease_frequency_counts_distinct_members() {
        let dx = |m: &str, g: &str| Diagnosis {
            member_id: m.into(),
            disease_group: g.to_string(),
            diagnosis_date: d(1),
        };
        let (diagnosed, rows) = disease_frequency(&[
            dx("A", "Diabetes"),
            dx("A", "Diabetes"),
            dx("B", "Diabetes"),
            dx("B", "Asthma"),
            dx("C", "Depression"),
            dx("D", "Asthma"),
        ]);
        assert_eq!(diagnosed, 4);
        let names: Vec<_> = rows.iter().map(|r| r.disease_group.as_str()).collect();
        assert_eq!(names, vec!["Asthma", "Diabetes", "Depression"]);
        assert_eq!(rows[1].members, 2);
        assert_eq!(rows[1].percent, 50.0);
    }

    #[test]
    fn recurrence_by_type() {
        let rows = recurrence(&sample_events());
        let ed = &rows[1];
        assert_eq!(ed.members_with_event, 2);
        assert_eq!(ed.recurrent_members, 1);
        assert_eq!(ed.recurrence_percent, 50.0);
        assert_eq!(ed.mean_events_per_member, 1.5);
        let pcp = &rows[2];
        assert_eq!(pcp.members_with_event, 0);
        assert_eq!(pcp.mean_events_per_member, 0.0);
    }

    #[test]
    fn empty_report_has_no_nan() {
        let report = DescriptiveReport::build(&[], &[]);
        assert_eq!(report.total_members, 0);
        assert!(report.diseases.is_empty());
        assert!(report.event_types.iter().all(|r| r.percent == 0.0));
        assert!(report
            .recurrence
            .iter()
            .all(|r| r.recurrence_percent == 0.0 && !r.mean_events_per_member.is_nan()));
    }
}

//! Program eligibility.
//!
//! A member with any Admission starting on or after the cutoff date is
//! excluded from tiering entirely, together with all of their other events.
//! Members only exist through their events, so a member with no events is
//! never considered.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use ct_common::{Event, EventType, MemberId};
use tracing::{debug, info};

/// Result of applying the exclusion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    pub cutoff: NaiveDate,
    /// Events of eligible members, in input order.
    pub events: Vec<Event>,
    pub eligible_members: BTreeSet<MemberId>,
    pub excluded_members: BTreeSet<MemberId>,
}

impl Eligibility {
    pub fn is_eligible(&self, member: &MemberId) -> bool {
        self.eligible_members.contains(member)
    }
}

/// An Admission starting on or after the cutoff disqualifies its member.
pub fn is_disqualifying(event: &Event, cutoff: NaiveDate) -> bool {
    event.event_type == EventType::Admission && event.start_date >= cutoff
}

/// Split events into eligible members' events and the excluded member set.
pub fn apply_eligibility(events: &[Event], cutoff: NaiveDate) -> Eligibility {
    let excluded_members: BTreeSet<MemberId> = events
        .iter()
        .filter(|e| is_disqualifying(e, cutoff))
        .map(|e| e.member_id.clone())
        .collect();

    let eligible_events: Vec<Event> = events
        .iter()
        .filter(|e| !excluded_members.contains(&e.member_id))
        .cloned()
        .collect();

    let eligible_members: BTreeSet<MemberId> = eligible_events
        .iter()
        .map(|e| e.member_id.clone())
        .collect();

    debug!(
        %cutoff,
        dropped_events = events.len() - eligible_events.len(),
        "eligibility filter applied"
    );
    info!(
        eligible = eligible_members.len(),
        excluded = excluded_members.len(),
        "members screened for recent admissions"
    );

    Eligibility {
        cutoff,
        events: eligible_events,
        eligible_members,
        excluded_members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ev(member: &str, kind: EventType, start: NaiveDate) -> Event {
        Event::new(member, kind, start, start)
    }

    #[test]
    fn admission_on_cutoff_excludes_member() {
        let cutoff = d(2020, 1, 1);
        let events = vec![
            ev("A", EventType::Admission, cutoff),
            ev("A", EventType::EdVisit, d(2019, 6, 1)),
            ev("B", EventType::EdVisit, d(2020, 3, 1)),
        ];
        let result = apply_eligibility(&events, cutoff);
        assert!(result.excluded_members.contains(&"A".into()));
        assert!(!result.is_eligible(&"A".into()));
        assert!(result.is_eligible(&"B".into()));
        assert_eq!(result.events.len(), 1);
        assert!(result.events.iter().all(|e| e.member_id.as_str() == "B"));
    }

    #[test]
    fn admission_before_cutoff_keeps_member() {
        let cutoff = d(2020, 1, 1);
        let events = vec![
            ev("P", EventType::Admission, d(2019, 12, 31)),
            ev("P", EventType::EdVisit, d(2020, 2, 1)),
        ];
        let result = apply_eligibility(&events, cutoff);
        assert!(result.excluded_members.is_empty());
        assert_eq!(result.events.len(), 2);
    }

    #[test]
    fn recent_non_admission_events_never_exclude() {
        let cutoff = d(2020, 1, 1);
        let events = vec![
            ev("C", EventType::EdVisit, d(2020, 5, 1)),
            ev("C", EventType::PcpVisit, d(2020, 5, 2)),
        ];
        let result = apply_eligibility(&events, cutoff);
        assert!(result.is_eligible(&"C".into()));
    }

    #[test]
    fn empty_input_propagates() {
        let result = apply_eligibility(&[], d(2020, 1, 1));
        assert!(result.events.is_empty());
        assert!(result.eligible_members.is_empty());
        assert!(result.excluded_members.is_empty());
    }
}

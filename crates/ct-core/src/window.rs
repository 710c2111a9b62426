//! Trailing-window utilization counts.
//!
//! For every event, `rolling_count` is the number of events of the same
//! member and event type whose start date lies in
//! `[start_date - window_days, start_date]`. With the default 364-day
//! window this is an inclusive 365-day look-back on calendar days.
//!
//! Each (member, event type) partition is sorted by start date and swept
//! with two pointers, so the cost is dominated by the sort. Events sharing a
//! start date are peers: every one of them counts the whole same-day group,
//! which keeps the count independent of row order within a day.
//!
//! Partitions are independent, so [`rolling_counts_parallel`] hands
//! contiguous runs of partitions to scoped worker threads and concatenates
//! their output in partition order. The result is identical to
//! [`rolling_counts`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use ct_common::{Event, EventType, MemberId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trailing count at one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UtilizationRecord {
    pub member_id: MemberId,
    pub event_type: EventType,
    pub start_date: NaiveDate,
    pub rolling_count: u32,
}

/// A member's peak trailing ED visit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MemberRate {
    pub member_id: MemberId,
    pub ed_rate: u32,
}

type PartitionKey = (MemberId, EventType);

/// Trailing counts over a date-sorted partition.
///
/// `dates` must be sorted ascending. The returned vector is parallel to
/// `dates`.
pub fn partition_counts(dates: &[NaiveDate], window_days: u32) -> Vec<u32> {
    let window = i64::from(window_days);
    let mut counts = Vec::with_capacity(dates.len());
    let mut left = 0usize;
    let mut group_start = 0usize;

    while group_start < dates.len() {
        let day = dates[group_start];
        let mut group_end = group_start;
        while group_end + 1 < dates.len() && dates[group_end + 1] == day {
            group_end += 1;
        }
        while (day - dates[left]).num_days() > window {
            left += 1;
        }
        let count = saturating_u32(group_end - left + 1);
        counts.extend(std::iter::repeat(count).take(group_end - group_start + 1));
        group_start = group_end + 1;
    }
    counts
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn partition(events: &[Event]) -> Vec<(PartitionKey, Vec<NaiveDate>)> {
    let mut parts: BTreeMap<PartitionKey, Vec<NaiveDate>> = BTreeMap::new();
    for event in events {
        parts
            .entry((event.member_id.clone(), event.event_type))
            .or_default()
            .push(event.start_date);
    }
    parts
        .into_iter()
        .map(|(key, mut dates)| {
            dates.sort_unstable();
            (key, dates)
        })
        .collect()
}

fn sweep(parts: &[(PartitionKey, Vec<NaiveDate>)], window_days: u32) -> Vec<UtilizationRecord> {
    let mut out = Vec::with_capacity(parts.iter().map(|(_, d)| d.len()).sum());
    for ((member_id, event_type), dates) in parts {
        let counts = partition_counts(dates, window_days);
        out.extend(dates.iter().zip(counts).map(|(&start_date, rolling_count)| {
            UtilizationRecord {
                member_id: member_id.clone(),
                event_type: *event_type,
                start_date,
                rolling_count,
            }
        }));
    }
    out
}

/// Trailing counts for every event, ordered by member, event type, then
/// start date.
pub fn rolling_counts(events: &[Event], window_days: u32) -> Vec<UtilizationRecord> {
    let parts = partition(events);
    debug!(partitions = parts.len(), events = events.len(), "rolling window sweep");
    sweep(&parts, window_days)
}

/// Same result as [`rolling_counts`], computed on up to `workers` threads.
pub fn rolling_counts_parallel(
    events: &[Event],
    window_days: u32,
    workers: usize,
) -> Vec<UtilizationRecord> {
    let parts = partition(events);
    let workers = workers.clamp(1, parts.len().max(1));
    if workers == 1 {
        return sweep(&parts, window_days);
    }

    let chunk_len = parts.len().div_ceil(workers);
    debug!(
        partitions = parts.len(),
        workers,
        chunk_len,
        "parallel rolling window sweep"
    );

    std::thread::scope(|scope| {
        let handles: Vec<_> = parts
            .chunks(chunk_len)
            .map(|chunk| scope.spawn(move || sweep(chunk, window_days)))
            .collect();

        let mut out = Vec::with_capacity(events.len());
        for handle in handles {
            match handle.join() {
                Ok(records) => out.extend(records),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        out
    })
}

/// Peak rolling count of `event_type` per member.
///
/// Every member in `members` gets exactly one row; members without any
/// `event_type` record get 0. Rows are ordered by member id.
pub fn member_rates(
    members: &BTreeSet<MemberId>,
    records: &[UtilizationRecord],
    event_type: EventType,
) -> Vec<MemberRate> {
    let mut peaks: BTreeMap<&MemberId, u32> = members.iter().map(|m| (m, 0)).collect();
    for record in records.iter().filter(|r| r.event_type == event_type) {
        if let Some(peak) = peaks.get_mut(&record.member_id) {
            *peak = (*peak).max(record.rolling_count);
        }
    }
    peaks
        .into_iter()
        .map(|(member_id, ed_rate)| MemberRate {
            member_id: member_id.clone(),
            ed_rate,
        })
        .collect()
}

//! Medical events extract (`member_profile_id, event_type, start_date, end_date`).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ct_common::{Error, Event, EventType, Result};
use tracing::{debug, info, warn};

use super::columns::{self, field, Column, MEMBER_ID};
use super::dates::date_field;
use super::diagnostics::{RecordSource, SkipReason, SkippedRecord};
use super::{csv_reader, LoadOutcome};

const EVENT_TYPE: Column = Column {
    names: &["event_type"],
};
const START_DATE: Column = Column {
    names: &["start_date"],
};
const END_DATE: Column = Column {
    names: &["end_date"],
};

/// Load and validate the events file at `path`.
pub fn load_events(path: &Path) -> Result<LoadOutcome<Event>> {
    let file = File::open(path)?;
    read_events(file, &path.display().to_string())
}

/// Read events from any CSV source. `input` labels the source in errors.
pub fn read_events<R: Read>(source: R, input: &str) -> Result<LoadOutcome<Event>> {
    let mut reader = csv_reader(source);
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        debug!(input, "events input is empty");
        return Ok(LoadOutcome::empty());
    }
    let [member_idx, type_idx, start_idx, end_idx] = columns::resolve(
        &headers,
        [&MEMBER_ID, &EVENT_TYPE, &START_DATE, &END_DATE],
        input,
    )?;

    let mut outcome = LoadOutcome::empty();
    for (row, result) in reader.records().enumerate() {
        // header is line 1; fall back to row count when position is unknown
        let fallback_line = row as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(Error::Csv(err)),
            Err(err) => {
                let line = err
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(fallback_line);
                warn!(input, line, error = %err, "unreadable event row");
                outcome.skipped.push(SkippedRecord {
                    source: RecordSource::Events,
                    line,
                    member_id: None,
                    reason: SkipReason::Unreadable {
                        message: err.to_string(),
                    },
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);

        let skip = |member_id: Option<&str>, reason: SkipReason| SkippedRecord {
            source: RecordSource::Events,
            line,
            member_id: member_id.map(str::to_string),
            reason,
        };

        let member_id = field(&record, member_idx);
        if member_id.is_empty() {
            outcome.skipped.push(skip(None, SkipReason::MissingMemberId));
            continue;
        }

        let raw_type = field(&record, type_idx);
        let event_type: EventType = match raw_type.parse() {
            Ok(kind) => kind,
            Err(_) => {
                outcome.skipped.push(skip(
                    Some(member_id),
                    SkipReason::UnknownEventType {
                        value: raw_type.to_string(),
                    },
                ));
                continue;
            }
        };

        let start_date = date_field(&record, start_idx, "start_date", line, input)?;
        let end_date = date_field(&record, end_idx, "end_date", line, input)?;
        if end_date < start_date {
            outcome.skipped.push(skip(
                Some(member_id),
                SkipReason::EndBeforeStart {
                    start_date,
                    end_date,
                },
            ));
            continue;
        }

        outcome
            .records
            .push(Event::new(member_id, event_type, start_date, end_date));
    }

    for skipped in &outcome.skipped {
        debug!(input, %skipped, "event record skipped");
    }
    info!(
        input,
        loaded = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "events loaded"
    );
    Ok(outcome)
}

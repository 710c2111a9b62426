//! Chronic and behavioral-health diagnoses extract
//! (`member_profile_id, disease_group, diagnosis_date`).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ct_common::{Diagnosis, Error, Result};
use tracing::{debug, info, warn};

use super::columns::{self, field, Column, MEMBER_ID};
use super::dates::date_field;
use super::diagnostics::{RecordSource, SkipReason, SkippedRecord};
use super::{csv_reader, LoadOutcome};

const DISEASE_GROUP: Column = Column {
    names: &["disease_group", "disease"],
};
const DIAGNOSIS_DATE: Column = Column {
    names: &["diagnosis_date", "date"],
};

pub fn load_diagnoses(path: &Path) -> Result<LoadOutcome<Diagnosis>> {
    let file = File::open(path)?;
    read_diagnoses(file, &path.display().to_string())
}

pub fn read_diagnoses<R: Read>(source: R, input: &str) -> Result<LoadOutcome<Diagnosis>> {
    let mut reader = csv_reader(source);
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(LoadOutcome::empty());
    }
    let [member_idx, group_idx, date_idx] =
        columns::resolve(&headers, [&MEMBER_ID, &DISEASE_GROUP, &DIAGNOSIS_DATE], input)?;

    let mut outcome = LoadOutcome::empty();
    for (row, result) in reader.records().enumerate() {
        let fallback_line = row as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(Error::Csv(err)),
            Err(err) => {
                warn!(input, error = %err, "unreadable diagnosis row");
                outcome.skipped.push(SkippedRecord {
                    source: RecordSource::Diagnoses,
                    line: err.position().map(|p| p.line()).unwrap_or(fallback_line),
                    member_id: None,
                    reason: SkipReason::Unreadable {
                        message: err.to_string(),
                    },
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        let member_id = field(&record, member_idx);
        if member_id.is_empty() {
            outcome.skipped.push(SkippedRecord {
                source: RecordSource::Diagnoses,
                line,
                member_id: None,
                reason: SkipReason::MissingMemberId,
            });
            continue;
        }

        let disease_group = field(&record, group_idx);
        if disease_group.is_empty() {
            outcome.skipped.push(SkippedRecord {
                source: RecordSource::Diagnoses,
                line,
                member_id: Some(member_id.to_string()),
                reason: SkipReason::MissingDiseaseGroup,
            });
            continue;
        }

        let diagnosis_date = date_field(&record, date_idx, "diagnosis_date", line, input)?;
        outcome.records.push(Diagnosis {
            member_id: member_id.into(),
            disease_group: disease_group.to_string(),
            diagnosis_date,
        });
    }

    debug!(input, skipped = outcome.skipped.len(), "diagnosis validation done");
    info!(input, loaded = outcome.records.len(), "diagnoses loaded");
    Ok(outcome)
}

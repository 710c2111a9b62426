//! Header lookup with column aliases.

use csv::StringRecord;
use ct_common::{Error, Result};

/// A required column and the header names accepted for it. The first name
/// is the canonical one used in error messages.
pub(crate) struct Column {
    pub names: &'static [&'static str],
}

pub(crate) const MEMBER_ID: Column = Column {
    names: &["member_profile_id", "member_id"],
};

/// Resolve each required column to its index in `headers`.
///
/// Matching ignores case and surrounding whitespace.
pub(crate) fn resolve<const N: usize>(
    headers: &StringRecord,
    columns: [&Column; N],
    input: &str,
) -> Result<[usize; N]> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
        .collect();

    let mut indexes = [0usize; N];
    for (slot, column) in indexes.iter_mut().zip(columns.iter()) {
        *slot = column
            .names
            .iter()
            .find_map(|name| normalized.iter().position(|h| h == name))
            .ok_or_else(|| Error::MissingColumn {
                input: input.to_string(),
                column: column.names[0].to_string(),
            })?;
    }
    Ok(indexes)
}

/// Field at `idx`, trimmed; missing trailing fields read as empty.
pub(crate) fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

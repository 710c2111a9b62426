//! Arrow schema for the tiered roster.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use ct_common::TieredMember;

/// Column names, in file order. Shared by every roster format.
pub const ROSTER_COLUMNS: [&str; 3] = ["member_id", "ed_rate", "tier"];

/// `member_id: Utf8, ed_rate: UInt32, tier: Utf8`, all non-nullable.
pub fn roster_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(ROSTER_COLUMNS[0], DataType::Utf8, false),
        Field::new(ROSTER_COLUMNS[1], DataType::UInt32, false),
        Field::new(ROSTER_COLUMNS[2], DataType::Utf8, false),
    ]))
}

/// Build one record batch from a slice of roster rows.
pub fn roster_batch(rows: &[TieredMember]) -> Result<RecordBatch, ArrowError> {
    let member_ids: StringArray = rows.iter().map(|r| Some(r.member_id.as_str())).collect();
    let rates: UInt32Array = rows.iter().map(|r| Some(r.ed_rate)).collect();
    let tiers: StringArray = rows.iter().map(|r| Some(r.tier.as_str())).collect();

    RecordBatch::try_new(
        roster_schema(),
        vec![
            Arc::new(member_ids) as ArrayRef,
            Arc::new(rates) as ArrayRef,
            Arc::new(tiers) as ArrayRef,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use ct_common::Tier;

    #[test]
    fn batch_matches_schema() {
        let rows = vec![
            TieredMember {
                member_id: "m1".into(),
                ed_rate: 9,
                tier: Tier::Tier1,
            },
            TieredMember {
                member_id: "m2".into(),
                ed_rate: 4,
                tier: Tier::Tier2,
            },
        ];
        let batch = roster_batch(&rows).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema(), roster_schema());

        let tiers = batch
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(tiers.value(0), "Tier 1");
        assert_eq!(tiers.value(1), "Tier 2");
        assert_eq!(tiers.null_count(), 0);
    }

    #[test]
    fn empty_batch_is_valid() {
        let batch = roster_batch(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 3);
    }
}

use std::collections::HashMap;

use crate::bucket::BucketLabel;

/// Occurrence counts keyed by bucket, then by exception text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateTable {
    pub buckets: HashMap<BucketLabel, HashMap<String, u32>>,
}

impl AggregateTable {
    pub fn record(&mut self, bucket: BucketLabel, text: String) {
        *self
            .buckets
            .entry(bucket)
            .or_default()
            .entry(text)
            .or_insert(0) += 1;
    }

    pub fn count(&self, bucket: &BucketLabel, text: &str) -> u32 {
        self.buckets
            .get(bucket)
            .and_then(|counts| counts.get(text))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.buckets.values().flat_map(|c| c.values()).sum()
    }
}

/// Count every `(bucket, text)` pair. Arrival order does not matter.
pub fn aggregate<I>(pairs: I) -> AggregateTable
where
    I: IntoIterator<Item = (BucketLabel, String)>,
{
    let mut table = AggregateTable::default();
    for (bucket, text) in pairs {
        table.record(bucket, text);
    }
    table
}

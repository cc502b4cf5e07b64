//! Version-prefixed on-disk encodings for store values.
//!
//! Every value is written as one version byte followed by the postcard
//! encoding of that version's struct, so the disk format can evolve without
//! rewriting existing databases.

use redb::TypeName;

use crate::types::{ProductRecord, ScanStats};

pub(crate) trait RecordVariant {
    const VERSION: u8;
}

impl RecordVariant for ProductRecord {
    const VERSION: u8 = 1;
}

impl RecordVariant for ScanStats {
    const VERSION: u8 = 1;
}

#[derive(Debug, Clone)]
pub(crate) enum VersionedRecord {
    V1(ProductRecord),
}

impl VersionedRecord {
    pub(crate) fn into_latest(self) -> ProductRecord {
        match self {
            VersionedRecord::V1(record) => record,
        }
    }
}

impl redb::Value for VersionedRecord {
    type SelfType<'a> = VersionedRecord;
    type AsBytes<'a> = Vec<u8>;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        let (version, data) = data.split_first().expect("empty record data");
        match *version {
            ProductRecord::VERSION => {
                let record =
                    postcard::from_bytes::<ProductRecord>(data).expect("invalid product record");
                VersionedRecord::V1(record)
            }
            version => panic!("unsupported record version: {}", version),
        }
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        match value {
            VersionedRecord::V1(record) => {
                postcard::to_extend(record, vec![ProductRecord::VERSION]).unwrap()
            }
        }
    }

    fn type_name() -> TypeName {
        TypeName::new("galley::ProductRecord")
    }
}

#[derive(Debug, Clone)]
pub(crate) enum VersionedScan {
    V1(ScanStats),
}

impl VersionedScan {
    pub(crate) fn into_latest(self) -> ScanStats {
        match self {
            VersionedScan::V1(stats) => stats,
        }
    }
}

impl redb::Value for VersionedScan {
    type SelfType<'a> = VersionedScan;
    type AsBytes<'a> = Vec<u8>;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        let (version, data) = data.split_first().expect("empty scan data");
        match *version {
            ScanStats::VERSION => {
                let stats = postcard::from_bytes::<ScanStats>(data).expect("invalid scan stats");
                VersionedScan::V1(stats)
            }
            version => panic!("unsupported scan version: {}", version),
        }
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        match value {
            VersionedScan::V1(stats) => postcard::to_extend(stats, vec![ScanStats::VERSION]).unwrap(),
        }
    }

    fn type_name() -> TypeName {
        TypeName::new("galley::ScanStats")
    }
}

#[cfg(test)]
mod tests;

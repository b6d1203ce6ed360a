use tcr_decombine::DcrRecord;
use tcr_types::TcrLocus;

/// A read for which only one of V and J was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRead {
    pub id: String,
    pub locus: TcrLocus,
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
}

impl From<&DcrRecord> for PartialRead {
    fn from(record: &DcrRecord) -> Self {
        PartialRead {
            id: record.read_id.clone(),
            locus: record.locus,
            sequence: record.sequence.clone(),
            quality: record.quality.clone(),
        }
    }
}

/// V-only and J-only reads collected from a decombination run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialPools {
    pub v_only: Vec<PartialRead>,
    pub j_only: Vec<PartialRead>,
}

impl PartialPools {
    /// Complete records are ignored.
    pub fn push(&mut self, record: &DcrRecord) {
        if record.is_v_only() {
            self.v_only.push(PartialRead::from(record));
        } else if record.is_j_only() {
            self.j_only.push(PartialRead::from(record));
        }
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DcrRecord>,
    {
        let mut pools = PartialPools::default();
        for record in records {
            pools.push(record);
        }
        pools
    }

    /// True when one of the pools is empty and no pairing is possible.
    pub fn nothing_to_pair(&self) -> bool {
        self.v_only.is_empty() || self.j_only.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pools_from_records() {
        let lines = [
            "TRA, 3, n/a, v1, ACGT, IIII",
            "TRA, 3, 1, 2, vj, ACGT, IIII",
            "TRB, n/a, 0, j1, GGCC, FFFF",
            "TRA, 5, n/a, v2, TTGA, IIII",
        ];
        let records: Vec<DcrRecord> = lines.iter().map(|l| l.parse().unwrap()).collect();
        let pools = PartialPools::from_records(&records);
        assert_eq!(
            pools.v_only.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["v1", "v2"]
        );
        assert_eq!(pools.j_only.len(), 1);
        assert_eq!(pools.j_only[0].locus, TcrLocus::TRB);
        assert_eq!(pools.j_only[0].sequence, b"GGCC".to_vec());
        assert!(!pools.nothing_to_pair());
        assert!(PartialPools::from_records(&records[..2]).nothing_to_pair());
    }
}

use bio::alphabets::dna::revcomp;
use bio::io::fastq;

/// A sequenced read. Bases are upper-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRead {
    pub id: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl SeqRead {
    pub fn new(id: impl Into<String>, seq: &[u8], qual: &[u8]) -> Self {
        SeqRead {
            id: id.into(),
            seq: seq.to_ascii_uppercase(),
            qual: qual.to_vec(),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.seq.len() == self.qual.len()
    }
}

impl From<&fastq::Record> for SeqRead {
    fn from(record: &fastq::Record) -> Self {
        SeqRead::new(record.id(), record.seq(), record.qual())
    }
}

/// Sequence and quality of a read as seen on one strand.
pub(crate) fn reverse_strand(seq: &[u8], qual: &[u8]) -> (Vec<u8>, Vec<u8>) {
    (revcomp(seq), qual.iter().rev().copied().collect())
}

//! The text form of a decombined read, one record per line.
//!
//! Fields are separated by `", "`:
//!
//! ```text
//! <locus>, <v index|n/a>, <j index|n/a>[, <deletions>], <read id>, <sequence>, <quality>[, <barcode>, <barcode quality>]
//! ```
//!
//! The deletion count is only written for complete (V and J) records. The
//! barcode fields are only written when the run used barcodes.

use crate::errors::RecordParseError;
use crate::rearrangement::RearrangementRecord;
use std::fmt;
use std::str::FromStr;
use tcr_types::TcrLocus;

const SEP: &str = ", ";
const MISSING: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode {
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcrRecord {
    pub locus: TcrLocus,
    pub v_index: Option<usize>,
    pub j_index: Option<usize>,
    pub deletions: Option<usize>,
    pub read_id: String,
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
    pub barcode: Option<Barcode>,
}

impl DcrRecord {
    /// `quality` covers the whole read in the frame the record was found in.
    pub fn new(
        rearrangement: RearrangementRecord,
        read_id: &str,
        quality: &[u8],
        barcode: Option<Barcode>,
    ) -> Self {
        let complete = rearrangement.is_complete();
        DcrRecord {
            locus: rearrangement.locus,
            v_index: rearrangement.v_index,
            j_index: rearrangement.j_index,
            deletions: complete.then_some(rearrangement.deletions),
            read_id: read_id.to_string(),
            quality: quality[rearrangement.bounds.clone()].to_vec(),
            sequence: rearrangement.sequence,
            barcode,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.v_index.is_some() && self.j_index.is_some()
    }

    pub fn is_v_only(&self) -> bool {
        self.v_index.is_some() && self.j_index.is_none()
    }

    pub fn is_j_only(&self) -> bool {
        self.v_index.is_none() && self.j_index.is_some()
    }
}

fn write_index(f: &mut fmt::Formatter<'_>, index: Option<usize>) -> fmt::Result {
    match index {
        Some(i) => write!(f, "{i}"),
        None => f.write_str(MISSING),
    }
}

impl fmt::Display for DcrRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEP}", self.locus)?;
        write_index(f, self.v_index)?;
        f.write_str(SEP)?;
        write_index(f, self.j_index)?;
        if let Some(deletions) = self.deletions {
            write!(f, "{SEP}{deletions}")?;
        }
        write!(
            f,
            "{SEP}{}{SEP}{}{SEP}{}",
            self.read_id,
            String::from_utf8_lossy(&self.sequence),
            String::from_utf8_lossy(&self.quality)
        )?;
        if let Some(barcode) = &self.barcode {
            write!(
                f,
                "{SEP}{}{SEP}{}",
                String::from_utf8_lossy(&barcode.sequence),
                String::from_utf8_lossy(&barcode.quality)
            )?;
        }
        Ok(())
    }
}

fn parse_index(value: &str, field: &'static str) -> Result<Option<usize>, RecordParseError> {
    if value == MISSING {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| RecordParseError::InvalidField {
            field,
            value: value.to_string(),
        })
}

impl FromStr for DcrRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let fields: Vec<&str> = line.split(SEP).collect();
        let too_few = |expected: usize| RecordParseError::TooFewFields {
            expected,
            found: fields.len(),
            line: line.to_string(),
        };
        if fields.len() < 6 {
            return Err(too_few(6));
        }

        let locus = fields[0]
            .parse::<TcrLocus>()
            .map_err(|_| RecordParseError::InvalidField {
                field: "locus",
                value: fields[0].to_string(),
            })?;
        let v_index = parse_index(fields[1], "V index")?;
        let j_index = parse_index(fields[2], "J index")?;
        if v_index.is_none() && j_index.is_none() {
            return Err(RecordParseError::NoGene {
                line: line.to_string(),
            });
        }

        let mut rest = &fields[3..];
        let deletions = if v_index.is_some() && j_index.is_some() {
            if fields.len() < 7 {
                return Err(too_few(7));
            }
            let value = rest[0];
            rest = &rest[1..];
            Some(value.parse().map_err(|_| RecordParseError::InvalidField {
                field: "deletions",
                value: value.to_string(),
            })?)
        } else {
            None
        };

        let barcode = match rest {
            [_, _, _] => None,
            [_, _, _, seq, qual] => Some(Barcode {
                sequence: seq.as_bytes().to_vec(),
                quality: qual.as_bytes().to_vec(),
            }),
            _ => {
                return Err(RecordParseError::TrailingFields {
                    line: line.to_string(),
                })
            }
        };

        Ok(DcrRecord {
            locus,
            v_index,
            j_index,
            deletions,
            read_id: rest[0].to_string(),
            sequence: rest[1].as_bytes().to_vec(),
            quality: rest[2].as_bytes().to_vec(),
            barcode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v_only() -> DcrRecord {
        DcrRecord {
            locus: TcrLocus::TRB,
            v_index: Some(41),
            j_index: None,
            deletions: None,
            read_id: "M01:1:1101:15589:1331".to_string(),
            sequence: b"ACGTTGCA".to_vec(),
            quality: b"FF,FF:,F".to_vec(),
            barcode: None,
        }
    }

    #[test]
    fn test_format_partial() {
        assert_eq!(
            v_only().to_string(),
            "TRB, 41, n/a, M01:1:1101:15589:1331, ACGTTGCA, FF,FF:,F"
        );
    }

    #[test]
    fn test_format_complete_with_barcode() {
        let record = DcrRecord {
            v_index: Some(3),
            j_index: Some(12),
            deletions: Some(4),
            barcode: Some(Barcode {
                sequence: b"NNAC".to_vec(),
                quality: b"##FF".to_vec(),
            }),
            ..v_only()
        };
        let line = record.to_string();
        assert_eq!(
            line,
            "TRB, 3, 12, 4, M01:1:1101:15589:1331, ACGTTGCA, FF,FF:,F, NNAC, ##FF"
        );
        assert_eq!(line.parse::<DcrRecord>().unwrap(), record);
    }

    #[test]
    fn test_parse_j_only() {
        let record: DcrRecord = "TRA, n/a, 7, r9, GGCA, IIII\n".parse().unwrap();
        assert!(record.is_j_only());
        assert_eq!(record.j_index, Some(7));
        assert_eq!(record.read_id, "r9");
        assert_eq!(record.quality, b"IIII".to_vec());
        assert_eq!(record.deletions, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "TRA, 1, n/a, r1, ACGT".parse::<DcrRecord>(),
            Err(RecordParseError::TooFewFields { .. })
        ));
        assert!(matches!(
            "TRX, 1, n/a, r1, ACGT, IIII".parse::<DcrRecord>(),
            Err(RecordParseError::InvalidField { field: "locus", .. })
        ));
        assert!(matches!(
            "TRA, n/a, n/a, r1, ACGT, IIII".parse::<DcrRecord>(),
            Err(RecordParseError::NoGene { .. })
        ));
        assert!(matches!(
            "TRA, 1, 2, x, r1, ACGT, IIII".parse::<DcrRecord>(),
            Err(RecordParseError::InvalidField { field: "deletions", .. })
        ));
        assert!(matches!(
            "TRA, 1, n/a, r1, ACGT, IIII, AC".parse::<DcrRecord>(),
            Err(RecordParseError::TrailingFields { .. })
        ));
    }
}

//! Parsing of Decombinator tag tables.
//!
//! A tag table has one line per gene, `<tag-sequence> <jump-offset>`, in the
//! same order as the records of the matching reference FASTA.

use crate::errors::CatalogError;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: Vec<u8>,
    pub jump: usize,
}

/// Read a tag table. Blank lines are skipped; tags are upper-cased and must
/// all have the same length.
pub fn read_tag_table<R: BufRead>(reader: R, path: &Path) -> Result<Vec<TagEntry>, CatalogError> {
    let mut entries: Vec<TagEntry> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line_num = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let entry = parse_tag_line(&line).ok_or_else(|| CatalogError::MalformedTagLine {
            line_num,
            line: line.clone(),
        })?;
        if let Some(first) = entries.first() {
            if first.tag.len() != entry.tag.len() {
                return Err(CatalogError::InconsistentTagLength {
                    line_num,
                    expected: first.tag.len(),
                    found: entry.tag.len(),
                });
            }
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_tag_line(line: &str) -> Option<TagEntry> {
    let mut words = line.split_whitespace();
    let tag = words.next()?;
    let jump = words.next()?.parse::<usize>().ok()?;
    if tag.is_empty() {
        return None;
    }
    Some(TagEntry {
        tag: tag.to_ascii_uppercase().into_bytes(),
        jump,
    })
}

use fxhash::FxHashMap;
use std::collections::BTreeMap;

/// One occurrence of a tag pattern in a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHit<'a> {
    /// Start of the matched text in the read.
    pub start: usize,
    /// Exclusive end of the matched text in the read.
    pub end: usize,
    /// Every gene (flat index, catalog order) whose fragment equals the
    /// matched text. Half-tags can be shared by several genes.
    pub genes: &'a [usize],
}

/// Exact lookup of one family of tag fragments (full tags, first halves or
/// second halves) for one segment.
///
/// Fragments are hashed by sequence, one map per fragment length, and every
/// window of a read with one of those lengths is looked up. Identical
/// fragments share an entry that lists all the genes carrying them.
#[derive(Debug, Clone, Default)]
pub struct TagPatterns {
    /// Fragment length and the map from fragment to pattern id, shortest first.
    by_len: Vec<(usize, FxHashMap<Vec<u8>, usize>)>,
    genes: Vec<Vec<usize>>,
}

impl TagPatterns {
    /// Empty fragments are ignored.
    pub fn new<'a, I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut by_len: BTreeMap<usize, FxHashMap<Vec<u8>, usize>> = BTreeMap::new();
        let mut genes: Vec<Vec<usize>> = Vec::new();
        for (gene, fragment) in fragments.into_iter().enumerate() {
            if fragment.is_empty() {
                continue;
            }
            let id = *by_len
                .entry(fragment.len())
                .or_default()
                .entry(fragment.to_vec())
                .or_insert_with(|| {
                    genes.push(Vec::new());
                    genes.len() - 1
                });
            genes[id].push(gene);
        }
        TagPatterns {
            by_len: by_len.into_iter().collect(),
            genes,
        }
    }

    /// All occurrences in `read`, overlapping ones included, ordered by start
    /// position and then by end.
    pub fn find_all<'s>(&'s self, read: &[u8]) -> Vec<TagHit<'s>> {
        let mut hits = Vec::new();
        for (len, table) in &self.by_len {
            for (start, kmer) in read.windows(*len).enumerate() {
                if let Some(&id) = table.get(kmer) {
                    hits.push(TagHit {
                        start,
                        end: start + len,
                        genes: &self.genes[id],
                    });
                }
            }
        }
        hits.sort_by_key(|hit| (hit.start, hit.end));
        hits
    }

    pub fn num_patterns(&self) -> usize {
        self.genes.len()
    }
}

/// Full-tag and half-tag lookups for one segment.
#[derive(Debug, Clone)]
pub struct TagLookups {
    pub full: TagPatterns,
    pub half1: TagPatterns,
    pub half2: TagPatterns,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shared_fragments_collapse() {
        let fragments: Vec<&[u8]> = vec![b"ACGT", b"TTGA", b"ACGT"];
        let patterns = TagPatterns::new(fragments);
        assert_eq!(patterns.num_patterns(), 2);
        let hits = patterns.find_all(b"GGACGTTGACC");
        assert_eq!(
            hits,
            vec![
                TagHit {
                    start: 2,
                    end: 6,
                    genes: &[0, 2]
                },
                TagHit {
                    start: 5,
                    end: 9,
                    genes: &[1]
                },
            ]
        );
    }

    #[test]
    fn test_overlapping_and_repeated_hits() {
        let fragments: Vec<&[u8]> = vec![b"AAA"];
        let patterns = TagPatterns::new(fragments);
        let starts: Vec<usize> = patterns.find_all(b"AAAAA").iter().map(|h| h.start).collect();
        assert_eq!(starts, vec![0, 1, 2]);
        assert!(patterns.find_all(b"CCCC").is_empty());
    }
}

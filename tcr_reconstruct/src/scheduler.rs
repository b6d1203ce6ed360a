use crate::config::ReconstructConfig;
use crate::overlap::OverlapAligner;
use crate::pool::PartialPools;
use crate::ranker::TcrCandidate;
use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;
use std::time::Instant;

/// Aligns every V-only read against every J-only read of the same locus on a
/// bounded thread pool, one chunk of V reads at a time.
pub struct ReconstructionScheduler {
    aligner: OverlapAligner,
    chunk_size: usize,
    threads: usize,
}

impl ReconstructionScheduler {
    pub fn new(config: &ReconstructConfig) -> Self {
        ReconstructionScheduler {
            aligner: OverlapAligner::new(config),
            chunk_size: config.chunk_size.max(1),
            threads: config.threads.unwrap_or_else(rayon::current_num_threads),
        }
    }

    /// One candidate per V-only read, in pool order.
    pub fn run(&self, pools: &PartialPools) -> Result<Vec<TcrCandidate>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .context("building the alignment thread pool")?;
        info!(
            "Aligning {} V-only reads against {} J-only reads on {} threads",
            pools.v_only.len(),
            pools.j_only.len(),
            self.threads
        );

        let mut candidates = Vec::with_capacity(pools.v_only.len());
        for (chunk_num, chunk) in pools.v_only.chunks(self.chunk_size).enumerate() {
            let start = Instant::now();
            let first_index = chunk_num * self.chunk_size;
            let results: Vec<TcrCandidate> = pool.install(|| {
                chunk
                    .par_iter()
                    .enumerate()
                    .map(|(offset, v)| {
                        let alignments = pools
                            .j_only
                            .iter()
                            .enumerate()
                            .filter(|(_, j)| j.locus == v.locus)
                            .flat_map(|(j_index, j)| self.aligner.align(v, j, j_index))
                            .collect();
                        TcrCandidate::new(first_index + offset, alignments)
                    })
                    .collect()
            });
            debug!(
                "Aligned chunk {} ({} V reads) in {:.3}s",
                chunk_num,
                chunk.len(),
                start.elapsed().as_secs_f64()
            );
            candidates.extend(results);
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PartialRead;
    use pretty_assertions::assert_eq;
    use tcr_types::TcrLocus;

    fn partial(id: &str, locus: TcrLocus, seq: &[u8]) -> PartialRead {
        PartialRead {
            id: id.to_string(),
            locus,
            sequence: seq.to_vec(),
            quality: vec![b'I'; seq.len()],
        }
    }

    const J_SEQ: &[u8] = b"CAGGCATTGATCCTAGCCCTGAACTTTTTTTTTTTTTTTTTTTT";

    #[test]
    fn test_chunks_keep_pool_order() {
        let v_only: Vec<PartialRead> = (0..7)
            .map(|i| partial(&format!("v{i}"), TcrLocus::TRB, b"ACGTTTGCAAGTCAGGCATT"))
            .collect();
        let pools = PartialPools {
            v_only,
            j_only: vec![partial("j", TcrLocus::TRB, J_SEQ)],
        };
        let scheduler = ReconstructionScheduler::new(&ReconstructConfig {
            chunk_size: 3,
            threads: Some(2),
            ..Default::default()
        });
        let candidates = scheduler.run(&pools).unwrap();
        assert_eq!(
            candidates.iter().map(|c| c.v_index).collect::<Vec<_>>(),
            (0..7).collect::<Vec<_>>()
        );
        assert!(candidates.iter().all(|c| c.best_overlap == 8));
    }

    #[test]
    fn test_only_same_locus_pairs() {
        let pools = PartialPools {
            v_only: vec![partial("v", TcrLocus::TRA, b"ACGTTTGCAAGTCAGGCATT")],
            j_only: vec![
                partial("j_beta", TcrLocus::TRB, J_SEQ),
                partial("j_alpha", TcrLocus::TRA, J_SEQ),
            ],
        };
        let candidates = ReconstructionScheduler::new(&ReconstructConfig::default())
            .run(&pools)
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].alignments.len(), 1);
        assert_eq!(candidates[0].alignments[0].j_id, "j_alpha");
        assert_eq!(candidates[0].alignments[0].j_index, 1);
    }
}

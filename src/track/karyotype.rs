//! Karyotype layout of a draft genome
//!
//! Contigs are drawn longest first. Contigs that are too short, or that fall
//! beyond the maximum count, are folded into one synthetic `other` segment.
//! A synthetic `missing_dna` segment stands for the part of the genome the
//! assembly is estimated to lack, given its completeness.

use std::str::FromStr;

use serde::Serialize;

use crate::defaults::{COMPLETENESS, MAX_CONTIGS, MIN_CONTIG_LEN};
use crate::error::{Result, TrackError};
use crate::stats::{n50_l50, ContigLength};
use crate::track::features::CdsTally;

pub const OTHER_SEGMENT_ID: &str = "other";
pub const MISSING_SEGMENT_ID: &str = "missing_dna";

/// Rank numbering of the two synthetic segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankPolicy {
    /// Every emitted segment gets the next rank
    #[default]
    Sequential,
    /// `other` and `missing_dna` both get `number of contigs + 1`
    Shared,
}

impl FromStr for RankPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(RankPolicy::Sequential),
            "shared" => Ok(RankPolicy::Shared),
            other => Err(format!(
                "unknown rank policy '{}', expected 'sequential' or 'shared'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Contig,
    Other,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSegment {
    pub id: String,
    pub rank: usize,
    pub length: usize,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenomeStats {
    pub num_contigs: usize,
    pub n50: usize,
    pub l50: usize,
    pub genome_size: usize,
    pub missing_size: usize,
    pub num_cds: usize,
    pub num_annotated_proteins: usize,
    pub num_hypothetical_proteins: usize,
    pub num_filtered_contigs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Karyotype {
    pub segments: Vec<LayoutSegment>,
    pub stats: GenomeStats,
}

/// Estimated size of the DNA absent from an assembly that is `completeness`% complete.
///
/// Fails with `InvalidParameter` when the estimate does not fit in a `usize`.
pub fn missing_size(genome_size: usize, completeness: f64) -> Result<usize> {
    let genome = genome_size as f64;
    let missing = (genome / (completeness / 100.0) - genome).round().max(0.0);
    if !missing.is_finite() || missing >= usize::MAX as f64 {
        return Err(TrackError::InvalidParameter(format!(
            "completeness {} gives an unrepresentable missing size for a {} bp genome",
            completeness, genome_size
        )));
    }
    Ok(missing as usize)
}

#[derive(Debug, Clone)]
pub struct KaryotypeBuilder {
    completeness: f64,
    min_contig_len: usize,
    max_contigs: usize,
    rank_policy: RankPolicy,
}

impl Default for KaryotypeBuilder {
    fn default() -> Self {
        Self {
            completeness: COMPLETENESS,
            min_contig_len: MIN_CONTIG_LEN,
            max_contigs: MAX_CONTIGS,
            rank_policy: RankPolicy::default(),
        }
    }
}

impl KaryotypeBuilder {
    /// Builder for an assembly of the given completeness, in `(0, 100]`.
    pub fn new(completeness: f64) -> Result<Self> {
        if !(completeness > 0.0 && completeness <= 100.0) {
            return Err(TrackError::InvalidParameter(format!(
                "completeness must be in (0, 100], got {}",
                completeness
            )));
        }
        Ok(Self {
            completeness,
            ..Self::default()
        })
    }

    pub fn min_contig_len(mut self, min_contig_len: usize) -> Self {
        self.min_contig_len = min_contig_len;
        self
    }

    pub fn max_contigs(mut self, max_contigs: usize) -> Self {
        self.max_contigs = max_contigs;
        self
    }

    pub fn rank_policy(mut self, rank_policy: RankPolicy) -> Self {
        self.rank_policy = rank_policy;
        self
    }

    pub fn build(&self, contigs: &[ContigLength], cds: &CdsTally) -> Result<Karyotype> {
        let n = n50_l50(contigs)?;
        let genome_size: usize = contigs.iter().map(|c| c.length).sum();
        let missing = missing_size(genome_size, self.completeness)?;

        // stable: equal lengths keep input order
        let mut sorted: Vec<&ContigLength> = contigs.iter().collect();
        sorted.sort_by(|a, b| b.length.cmp(&a.length));

        let mut segments = Vec::new();
        let mut other_bps = 0;
        let mut filtered = 0;
        for (i, contig) in sorted.iter().enumerate() {
            let rank = i + 1;
            if contig.length < self.min_contig_len || rank > self.max_contigs {
                other_bps += contig.length;
                filtered += 1;
                continue;
            }
            segments.push(LayoutSegment {
                id: contig.id.clone(),
                rank,
                length: contig.length,
                kind: SegmentKind::Contig,
            });
        }

        let mut next_rank = segments.len() + 1;
        if other_bps > 0 {
            segments.push(LayoutSegment {
                id: OTHER_SEGMENT_ID.to_string(),
                rank: self.synthetic_rank(contigs.len(), next_rank),
                length: other_bps,
                kind: SegmentKind::Other,
            });
            next_rank += 1;
        }
        if missing > 0 {
            segments.push(LayoutSegment {
                id: MISSING_SEGMENT_ID.to_string(),
                rank: self.synthetic_rank(contigs.len(), next_rank),
                length: missing,
                kind: SegmentKind::Missing,
            });
        }

        Ok(Karyotype {
            segments,
            stats: GenomeStats {
                num_contigs: contigs.len(),
                n50: n.n50,
                l50: n.l50,
                genome_size,
                missing_size: missing,
                num_cds: cds.total(),
                num_annotated_proteins: cds.annotated,
                num_hypothetical_proteins: cds.hypothetical,
                num_filtered_contigs: filtered,
            },
        })
    }

    fn synthetic_rank(&self, num_contigs: usize, next_rank: usize) -> usize {
        match self.rank_policy {
            RankPolicy::Sequential => next_rank,
            RankPolicy::Shared => num_contigs + 1,
        }
    }
}

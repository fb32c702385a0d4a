use crate::error::{Result, TrackError};
use crate::io::sequence::{Contig, SequenceReader};
use serde::Serialize;

/// Counts of unambiguous bases; `t` includes uracil.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NucleotideCounts {
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub t: usize,
}

impl NucleotideCounts {
    pub fn total(&self) -> usize {
        self.a + self.c + self.g + self.t
    }

    pub fn gc(&self) -> usize {
        self.g + self.c
    }

    /// GC fraction over A/C/G/T only; 0 when there are no such bases.
    pub fn gc_fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.gc() as f64 / total as f64
        }
    }
}

impl std::ops::AddAssign for NucleotideCounts {
    fn add_assign(&mut self, other: Self) {
        self.a += other.a;
        self.c += other.c;
        self.g += other.g;
        self.t += other.t;
    }
}

/// Count A, C, G and T/U case-insensitively. Ambiguous bases are ignored.
pub fn count_nt(seq: &str) -> NucleotideCounts {
    count_nt_bytes(seq.as_bytes())
}

pub fn count_nt_bytes(seq: &[u8]) -> NucleotideCounts {
    let mut counts = NucleotideCounts::default();
    for &b in seq {
        match b {
            b'A' | b'a' => counts.a += 1,
            b'C' | b'c' => counts.c += 1,
            b'G' | b'g' => counts.g += 1,
            b'T' | b't' | b'U' | b'u' => counts.t += 1,
            _ => {}
        }
    }
    counts
}

/// (G+C)/(A+C+G+T) of a sequence, 0 for sequences without unambiguous bases.
pub fn gc_fraction(seq: &str) -> f64 {
    count_nt(seq).gc_fraction()
}

/// Pooled GC fraction over a set of contigs.
pub fn gc_of_seqs(contigs: &[Contig]) -> f64 {
    let mut totals = NucleotideCounts::default();
    for contig in contigs {
        totals += count_nt(&contig.sequence);
    }
    totals.gc_fraction()
}

/// Number of bases that are not A, C, G or T/U.
pub fn ambiguous_nucleotides(seq: &str) -> usize {
    seq.len() - count_nt(seq).total()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigLength {
    pub id: String,
    pub length: usize,
}

/// Length of every contig, in input order.
pub fn contig_lengths(contigs: &[Contig]) -> Vec<ContigLength> {
    contigs
        .iter()
        .map(|c| ContigLength {
            id: c.id.clone(),
            length: c.len(),
        })
        .collect()
}

/// N50 and the 1-based rank (L50) of the contig reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct N50L50 {
    pub n50: usize,
    pub l50: usize,
}

/// Sort lengths descending and walk until half of the total is covered.
pub fn n50_l50(lengths: &[ContigLength]) -> Result<N50L50> {
    if lengths.is_empty() {
        return Err(TrackError::EmptyInput("no sequences provided".to_string()));
    }

    let mut sorted: Vec<usize> = lengths.iter().map(|c| c.length).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let total: usize = sorted.iter().sum();

    // cumulative >= total / 2, kept in integers
    let mut acc = 0;
    let mut l50 = 0;
    for &len in &sorted {
        acc += len;
        l50 += 1;
        if 2 * acc >= total {
            break;
        }
    }

    Ok(N50L50 { n50: sorted[l50 - 1], l50 })
}

pub fn mean_length(lengths: &[ContigLength]) -> f64 {
    if lengths.is_empty() {
        return 0.0;
    }
    let total: usize = lengths.iter().map(|c| c.length).sum();
    total as f64 / lengths.len() as f64
}

pub fn max_length(lengths: &[ContigLength]) -> usize {
    lengths.iter().map(|c| c.length).max().unwrap_or(0)
}

#[derive(Serialize)]
pub struct Stats {
    pub total_contigs: usize,
    pub total_length: usize,
    pub average_length: f64,
    pub max_length: usize,
    pub n50: usize,
    pub l50: usize,
    pub gc: f64,
    pub ambiguous_bases: usize,
}

/// Assembly statistics for a FASTA/FASTQ file, streamed record by record.
pub fn calculate_stats(path: &str) -> Result<Stats> {
    let mut lengths = Vec::new();
    let mut counts = NucleotideCounts::default();
    let mut ambiguous = 0;

    for record in SequenceReader::open(path)?.require_records() {
        let contig = record?;
        let nt = count_nt(&contig.sequence);
        ambiguous += contig.len() - nt.total();
        counts += nt;
        lengths.push(ContigLength {
            id: contig.id,
            length: contig.sequence.len(),
        });
    }

    let n = n50_l50(&lengths)?;
    Ok(Stats {
        total_contigs: lengths.len(),
        total_length: lengths.iter().map(|c| c.length).sum(),
        average_length: mean_length(&lengths),
        max_length: max_length(&lengths),
        n50: n.n50,
        l50: n.l50,
        gc: 100.0 * counts.gc_fraction(),
        ambiguous_bases: ambiguous,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn lengths(values: &[usize]) -> Vec<ContigLength> {
        values
            .iter()
            .enumerate()
            .map(|(i, &length)| ContigLength {
                id: format!("contig_{}", i + 1),
                length,
            })
            .collect()
    }

    #[test]
    fn test_count_nt_ignores_ambiguous() {
        let counts = count_nt("AaCcGgTtUuNNRY-");
        assert_eq!(counts, NucleotideCounts { a: 2, c: 2, g: 2, t: 4 });
        assert_eq!(ambiguous_nucleotides("AaCcGgTtUuNNRY-"), 5);
    }

    #[test]
    fn test_gc_fraction() {
        assert_eq!(gc_fraction(""), 0.0);
        assert_eq!(gc_fraction("NNNN"), 0.0);
        assert_eq!(gc_fraction("GGCC"), 1.0);
        assert_eq!(gc_fraction("ATGC"), 0.5);
        // N does not dilute the fraction
        assert_eq!(gc_fraction("GCNNNNAT"), 0.5);
        let gc = gc_fraction("AAAACCCCCGGGGTTTT");
        assert!((gc - 9.0 / 17.0).abs() < 1e-12);
    }

    #[test]
    fn test_gc_of_seqs_is_pooled() {
        let contigs = vec![Contig::new("a", "GGGG"), Contig::new("b", "AAAAAAAAAAAA")];
        assert!((gc_of_seqs(&contigs) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_n50_l50() {
        let n = n50_l50(&lengths(&[20, 24, 4])).unwrap();
        assert_eq!(n, N50L50 { n50: 24, l50: 1 });

        let n = n50_l50(&lengths(&[10, 10, 10, 10])).unwrap();
        assert_eq!(n, N50L50 { n50: 10, l50: 2 });

        let n = n50_l50(&lengths(&[1000, 500])).unwrap();
        assert_eq!(n, N50L50 { n50: 1000, l50: 1 });

        // exactly half reached by the first contig
        let n = n50_l50(&lengths(&[50, 25, 25])).unwrap();
        assert_eq!(n, N50L50 { n50: 50, l50: 1 });
    }

    #[test]
    fn test_n50_l50_empty() {
        assert!(matches!(n50_l50(&[]), Err(TrackError::EmptyInput(_))));
    }

    #[test]
    fn test_n50_rank_matches_length() {
        let input = lengths(&[7, 300, 12, 12, 95, 1, 60]);
        let n = n50_l50(&input).unwrap();
        let mut sorted: Vec<usize> = input.iter().map(|c| c.length).collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert!(n.l50 >= 1 && n.l50 <= input.len());
        assert_eq!(sorted[n.l50 - 1], n.n50);
    }

    #[test]
    fn test_calculate_stats() {
        let mut file = Builder::new().suffix(".fna").tempfile().unwrap();
        writeln!(file, ">contig_1").unwrap();
        writeln!(file, "ATCGATCGATCGATCGATCG").unwrap(); // 20 bp
        writeln!(file, ">contig_2").unwrap();
        writeln!(file, "GCTAGCTAGCTAGCTAGCTAGCTA").unwrap(); // 24 bp
        writeln!(file, ">contig_3").unwrap();
        writeln!(file, "ATCN").unwrap(); // 4 bp

        let stats = calculate_stats(file.path().to_str().unwrap()).unwrap();

        assert_eq!(stats.total_contigs, 3);
        assert_eq!(stats.total_length, 48);
        assert_eq!(stats.average_length, 16.0);
        assert_eq!(stats.max_length, 24);
        assert_eq!(stats.n50, 24);
        assert_eq!(stats.l50, 1);
        assert_eq!(stats.ambiguous_bases, 1);
    }

    #[test]
    fn test_calculate_stats_empty_file() {
        let file = Builder::new().suffix(".fa").tempfile().unwrap();
        let result = calculate_stats(file.path().to_str().unwrap());
        assert!(matches!(result, Err(TrackError::EmptyInput(_))));
    }
}

//! Format-agnostic sequence reading
//!
//! [`SequenceReader`] picks the FASTA or FASTQ parser from the file
//! extension (an optional `.gz` suffix is looked through) and yields
//! contigs lazily, one record at a time. It is forward-only: reading a file
//! twice means opening it twice.

use std::collections::HashSet;
use std::io::{BufRead, Lines};

use crate::error::{Result, TrackError};
use crate::io::fasta::FastaStreamParser;
use crate::io::fastq::FastqStreamParser;
use crate::io::open_input;

/// A named sequence from an assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub id: String,
    pub sequence: String,
}

impl Contig {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqFormat {
    Fasta,
    Fastq,
}

impl SeqFormat {
    /// Infer the format from the extension, e.g. `genome.fna.gz` -> FASTA.
    pub fn from_path(path: &str) -> Result<Self> {
        let stem = path.strip_suffix(".gz").unwrap_or(path);
        let ext = match stem.rsplit_once('.') {
            Some((_, ext)) if !ext.contains('/') => ext,
            _ => return Err(TrackError::UnsupportedFormat(path.to_string())),
        };
        match ext {
            "fa" | "fasta" | "fna" | "faa" => Ok(SeqFormat::Fasta),
            "fq" | "fastq" => Ok(SeqFormat::Fastq),
            _ => Err(TrackError::UnsupportedFormat(path.to_string())),
        }
    }
}

enum Records {
    Fasta(FastaStreamParser<Lines<Box<dyn BufRead>>>),
    Fastq(FastqStreamParser<Lines<Box<dyn BufRead>>>),
}

/// Lazy reader over the records of a FASTA/FASTQ file.
pub struct SequenceReader {
    records: Records,
    path: String,
    require_records: bool,
    seen: usize,
    finished: bool,
}

impl SequenceReader {
    /// Open a sequence file; fails with `NotFound` or `UnsupportedFormat`.
    pub fn open(path: &str) -> Result<Self> {
        let reader = open_input(path)?;
        let format = SeqFormat::from_path(path)?;
        Ok(Self::from_reader(reader, path, format))
    }

    /// Open a sequence file in a declared format, whatever its extension.
    pub fn with_format(path: &str, format: SeqFormat) -> Result<Self> {
        Ok(Self::from_reader(open_input(path)?, path, format))
    }

    fn from_reader(reader: Box<dyn BufRead>, path: &str, format: SeqFormat) -> Self {
        let records = match format {
            SeqFormat::Fasta => Records::Fasta(FastaStreamParser::new(reader.lines(), path)),
            SeqFormat::Fastq => Records::Fastq(FastqStreamParser::new(reader.lines(), path)),
        };
        Self {
            records,
            path: path.to_string(),
            require_records: false,
            seen: 0,
            finished: false,
        }
    }

    /// Make reaching end-of-file without a single record an `EmptyInput` error.
    pub fn require_records(mut self) -> Self {
        self.require_records = true;
        self
    }

    pub fn records_read(&self) -> usize {
        self.seen
    }
}

impl Iterator for SequenceReader {
    type Item = Result<Contig>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let next = match &mut self.records {
            Records::Fasta(parser) => parser.next(),
            Records::Fastq(parser) => parser.next(),
        };

        match next {
            Some(Ok(contig)) => {
                self.seen += 1;
                Some(Ok(contig))
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(e))
            }
            None => {
                self.finished = true;
                if self.require_records && self.seen == 0 {
                    Some(Err(TrackError::EmptyInput(format!(
                        "no sequences in {}",
                        self.path
                    ))))
                } else {
                    None
                }
            }
        }
    }
}

/// Read every record of a sequence file into memory, in file order.
///
/// An empty file gives an empty vector. Identifiers must be unique.
pub fn read_contigs(path: &str) -> Result<Vec<Contig>> {
    let mut contigs = Vec::new();
    let mut ids = HashSet::new();
    for record in SequenceReader::open(path)? {
        let contig = record?;
        if !ids.insert(contig.id.clone()) {
            return Err(TrackError::InvalidInput(format!(
                "duplicate sequence id '{}' in {}",
                contig.id, path
            )));
        }
        contigs.push(contig);
    }
    Ok(contigs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SeqFormat::from_path("mag.fna").unwrap(), SeqFormat::Fasta);
        assert_eq!(SeqFormat::from_path("mag.fa.gz").unwrap(), SeqFormat::Fasta);
        assert_eq!(SeqFormat::from_path("proteins.faa").unwrap(), SeqFormat::Fasta);
        assert_eq!(SeqFormat::from_path("reads.fastq.gz").unwrap(), SeqFormat::Fastq);
        assert_eq!(SeqFormat::from_path("reads.fq").unwrap(), SeqFormat::Fastq);
        assert!(matches!(
            SeqFormat::from_path("mag.gbk"),
            Err(TrackError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SeqFormat::from_path("dir.fa/genome"),
            Err(TrackError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_open_missing_and_unsupported() {
        assert!(matches!(
            SequenceReader::open("/no/such/genome.fna"),
            Err(TrackError::NotFound(_))
        ));

        let dir = tempdir().unwrap();
        let path = dir.path().join("genome.txt");
        std::fs::write(&path, ">a\nACGT\n").unwrap();
        assert!(matches!(
            SequenceReader::open(path.to_str().unwrap()),
            Err(TrackError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_declared_format_ignores_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("genome.txt");
        std::fs::write(&path, ">a\nACGT\n>b\nGG\n").unwrap();
        let path = path.to_str().unwrap();

        let contigs: Vec<Contig> = SequenceReader::with_format(path, SeqFormat::Fasta)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(contigs, vec![Contig::new("a", "ACGT"), Contig::new("b", "GG")]);

        assert!(matches!(
            SequenceReader::with_format("/no/such/genome.txt", SeqFormat::Fasta),
            Err(TrackError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_file_bulk_and_required() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.fna");
        File::create(&path).unwrap();
        let path = path.to_str().unwrap();

        assert!(read_contigs(path).unwrap().is_empty());

        let mut reader = SequenceReader::open(path).unwrap().require_records();
        assert!(matches!(reader.next(), Some(Err(TrackError::EmptyInput(_)))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_gzipped_fasta() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("genome.fna.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        writeln!(encoder, ">contig_1").unwrap();
        writeln!(encoder, "ACGTACGT").unwrap();
        writeln!(encoder, ">contig_2").unwrap();
        writeln!(encoder, "GG").unwrap();
        encoder.finish().unwrap();

        let mut reader = SequenceReader::open(path.to_str().unwrap()).unwrap();
        let ids: Vec<String> = reader.by_ref().map(|r| r.unwrap().id).collect();
        assert_eq!(ids, vec!["contig_1", "contig_2"]);
        assert_eq!(reader.records_read(), 2);
    }

    #[test]
    fn test_fastq_dispatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reads.fastq");
        std::fs::write(&path, "@r1\nACGT\n+\nIIII\n").unwrap();

        let contigs = read_contigs(path.to_str().unwrap()).unwrap();
        assert_eq!(contigs, vec![Contig::new("r1", "ACGT")]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dups.fa");
        std::fs::write(&path, ">a\nAC\n>a\nGT\n").unwrap();

        let err = read_contigs(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, TrackError::InvalidInput(_)));
    }
}

// src/io/fastq.rs
use std::io;

use crate::error::{Result, TrackError};
use crate::io::sequence::Contig;

/// Iterator adaptor to handle streaming FASTQ parsing
///
/// Records are fixed four-line blocks. Only the identifier (first token of
/// the `@` line) and the sequence line are kept; the quality line must be
/// present but is discarded.
pub struct FastqStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    lines: I,
    path: String,
    line_no: usize,
    done: bool,
}

impl<I> FastqStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I, path: &str) -> Self {
        Self {
            lines,
            path: path.to_string(),
            line_no: 0,
            done: false,
        }
    }

    fn next_line(&mut self) -> Option<io::Result<String>> {
        let line = self.lines.next();
        if line.is_some() {
            self.line_no += 1;
        }
        line
    }

    /// Next line of a record that has already started.
    fn record_line(&mut self, what: &str) -> Result<String> {
        match self.next_line() {
            Some(Ok(line)) => Ok(line),
            Some(Err(e)) => Err(e.into()),
            None => Err(TrackError::malformed(
                &self.path,
                self.line_no,
                format!("truncated record, missing {} line", what),
            )),
        }
    }

    fn read_record(&mut self, header: String) -> Result<Contig> {
        let header_line = self.line_no;
        let id = match header.strip_prefix('@') {
            Some(rest) => rest.split_whitespace().next().unwrap_or("").to_string(),
            None => {
                return Err(TrackError::malformed(
                    &self.path,
                    header_line,
                    "expected a '@' header line",
                ))
            }
        };

        let sequence = self.record_line("sequence")?;
        let plus = self.record_line("separator")?;
        if !plus.starts_with('+') {
            return Err(TrackError::malformed(
                &self.path,
                self.line_no,
                "expected a '+' separator line",
            ));
        }
        self.record_line("quality")?;

        Ok(Contig::new(id, sequence.trim().to_string()))
    }
}

impl<I> Iterator for FastqStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Contig>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let header = loop {
            match self.next_line() {
                Some(Ok(line)) if line.trim().is_empty() => continue,
                Some(Ok(line)) => break line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return None;
                }
            }
        };

        let record = self.read_record(header);
        if record.is_err() {
            self.done = true;
        }
        Some(record)
    }
}

/// Stream FASTQ records for memory-efficient processing
pub fn stream_fastq_records<R: io::BufRead>(reader: R, path: &str) -> FastqStreamParser<io::Lines<R>> {
    FastqStreamParser::new(reader.lines(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Vec<Result<Contig>> {
        stream_fastq_records(Cursor::new(text.to_string()), "reads.fq").collect()
    }

    #[test]
    fn test_reads_id_and_sequence() {
        let records = parse("@read1 extra\nACGT\n+\nFFFF\n@read2\nGG\n+read2\nFF\n");
        assert_eq!(records.len(), 2);
        let first = records[0].as_ref().unwrap();
        assert_eq!(first.id, "read1");
        assert_eq!(first.sequence, "ACGT");
        assert_eq!(records[1].as_ref().unwrap().id, "read2");
    }

    #[test]
    fn test_blank_lines_between_records() {
        let records = parse("@read1\nACGT\n+\nFFFF\n\n\n@read2\nGG\n+\nFF\n");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_truncated_record() {
        let records = parse("@read1\nACGT\n+\n");
        assert_eq!(records.len(), 1);
        assert!(matches!(
            records[0],
            Err(TrackError::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_at_sign() {
        let records = parse("read1\nACGT\n+\nFFFF\n");
        assert!(matches!(
            records[0],
            Err(TrackError::MalformedRecord { line: 1, .. })
        ));
    }
}

// src/io/fasta.rs
use std::io;
use std::mem;

use crate::error::{Result, TrackError};
use crate::io::sequence::Contig;

/// Iterator adaptor turning FASTA lines into contigs.
///
/// A record starts at a `>` header; the identifier is the first
/// whitespace-delimited token after the marker. Sequence lines are
/// concatenated with all whitespace removed and blank lines are skipped.
pub struct FastaStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    lines: I,
    path: String,
    line_no: usize,
    pending_id: Option<String>,
    sequence: String,
    done: bool,
}

impl<I> FastaStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I, path: &str) -> Self {
        Self {
            lines,
            path: path.to_string(),
            line_no: 0,
            pending_id: None,
            sequence: String::new(),
            done: false,
        }
    }

    fn emit(&mut self, id: String) -> Contig {
        Contig::new(id, mem::take(&mut self.sequence))
    }
}

impl<I> Iterator for FastaStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Contig>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return self.pending_id.take().map(|id| Ok(self.emit(id)));
                }
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('>') {
                let id = header.split_whitespace().next().unwrap_or("").to_string();
                if let Some(previous) = self.pending_id.replace(id) {
                    return Some(Ok(self.emit(previous)));
                }
                continue;
            }

            if self.pending_id.is_none() {
                self.done = true;
                return Some(Err(TrackError::malformed(
                    &self.path,
                    self.line_no,
                    "sequence data before the first '>' header",
                )));
            }

            self.sequence
                .extend(trimmed.chars().filter(|c| !c.is_whitespace()));
        }
    }
}

/// Stream FASTA records from any buffered reader.
pub fn stream_fasta_records<R: io::BufRead>(reader: R, path: &str) -> FastaStreamParser<io::Lines<R>> {
    FastaStreamParser::new(reader.lines(), path)
}

//! Per-base depth files: `contig<TAB>0-based position<TAB>depth`, one row per base.

use std::collections::HashSet;
use std::io::{self, BufRead};

use crate::error::{Result, TrackError};
use crate::io::open_input;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthRow {
    pub contig: String,
    pub position: usize,
    pub depth: u64,
}

pub struct DepthReader<R: BufRead> {
    lines: io::Lines<R>,
    path: String,
    line_no: usize,
    known: Option<HashSet<String>>,
    skipped: usize,
    done: bool,
}

impl DepthReader<Box<dyn BufRead>> {
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::new(open_input(path)?, path))
    }
}

impl<R: BufRead> DepthReader<R> {
    pub fn new(reader: R, path: &str) -> Self {
        Self {
            lines: reader.lines(),
            path: path.to_string(),
            line_no: 0,
            known: None,
            skipped: 0,
            done: false,
        }
    }

    /// Skip rows of any other contig before their numeric columns are parsed.
    pub fn only_contigs<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.known = Some(ids.into_iter().collect());
        self
    }

    /// Rows dropped by [`DepthReader::only_contigs`]
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }

    fn is_known(&self, line: &str) -> bool {
        match &self.known {
            Some(known) => {
                let contig = line.split('\t').next().unwrap_or_default();
                known.contains(contig)
            }
            None => true,
        }
    }

    fn parse_line(&self, line: &str) -> Result<DepthRow> {
        let mut cols = line.trim_end_matches('\r').split('\t');
        let (contig, position, depth) = match (cols.next(), cols.next(), cols.next()) {
            (Some(c), Some(p), Some(d)) => (c, p, d),
            _ => {
                return Err(TrackError::malformed(
                    &self.path,
                    self.line_no,
                    "expected contig, position and depth columns",
                ))
            }
        };

        let position = position.trim().parse::<usize>().map_err(|_| {
            TrackError::malformed(&self.path, self.line_no, format!("invalid position '{}'", position))
        })?;
        let depth = depth.trim().parse::<u64>().map_err(|_| {
            TrackError::malformed(&self.path, self.line_no, format!("invalid depth '{}'", depth))
        })?;

        Ok(DepthRow {
            contig: contig.to_string(),
            position,
            depth,
        })
    }
}

impl<R: BufRead> Iterator for DepthReader<R> {
    type Item = Result<DepthRow>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };
            self.line_no += 1;

            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            if !self.is_known(&line) {
                self.skipped += 1;
                continue;
            }

            let row = self.parse_line(&line);
            if row.is_err() {
                self.done = true;
            }
            return Some(row);
        }
        None
    }
}

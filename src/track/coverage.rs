//! Coverage deviation track from a per-base depth file.
//!
//! Depth is accumulated per `(contig, floor(position / w))` in a first pass,
//! together with the genome-wide sum used for the mean. The deviation of
//! every window is only computed once the whole file has been read.

use std::collections::{BTreeMap, HashMap};

use crate::diagnostics::Diagnostics;
use crate::error::{Result, TrackError};
use crate::io::coverage::{DepthReader, DepthRow};
use crate::stats::ContigLength;
use crate::style::DeviationStyle;
use crate::track::window::WindowedPoint;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DepthAccumulator {
    depth_sum: u64,
}

/// Two-level accumulator: contig (in genome order) -> window index -> depth.
#[derive(Debug)]
pub struct CoverageWindows {
    window: usize,
    contigs: Vec<ContigLength>,
    index: HashMap<String, usize>,
    windows: Vec<BTreeMap<usize, DepthAccumulator>>,
    contig_depth: Vec<u64>,
    total_depth: u64,
    total_bases: u64,
    skipped_rows: usize,
    rows_past_end: usize,
}

impl CoverageWindows {
    pub fn new(contigs: &[ContigLength], window: usize) -> Result<Self> {
        if window == 0 {
            return Err(TrackError::InvalidParameter(
                "coverage window size must be at least 1".to_string(),
            ));
        }
        let index = contigs
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        Ok(Self {
            window,
            contigs: contigs.to_vec(),
            index,
            windows: vec![BTreeMap::new(); contigs.len()],
            contig_depth: vec![0; contigs.len()],
            total_depth: 0,
            total_bases: 0,
            skipped_rows: 0,
            rows_past_end: 0,
        })
    }

    /// Add one depth row; rows of unknown contigs are skipped and return `false`.
    pub fn add(&mut self, row: &DepthRow) -> bool {
        let Some(&i) = self.index.get(&row.contig) else {
            self.skipped_rows += 1;
            return false;
        };

        self.total_depth += row.depth;
        self.total_bases += 1;

        // counted in the genome mean only
        if row.position >= self.contigs[i].length {
            self.rows_past_end += 1;
            return true;
        }

        let acc = self.windows[i].entry(row.position / self.window).or_default();
        acc.depth_sum += row.depth;
        self.contig_depth[i] += row.depth;
        true
    }

    pub(crate) fn skip_rows(&mut self, n: usize) {
        self.skipped_rows += n;
    }

    /// Rows whose contig is not part of the genome
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Rows of known contigs positioned at or beyond the contig end
    pub fn rows_past_end(&self) -> usize {
        self.rows_past_end
    }

    /// Mean depth over every accepted row.
    pub fn mean_depth(&self) -> Result<f64> {
        if self.total_bases == 0 {
            return Err(TrackError::InvalidInput(
                "no coverage rows for any contig of the genome, mean coverage is undefined"
                    .to_string(),
            ));
        }
        let mean = self.total_depth as f64 / self.total_bases as f64;
        if mean == 0.0 {
            return Err(TrackError::InvalidInput(
                "mean coverage is zero, deviations are undefined".to_string(),
            ));
        }
        Ok(mean)
    }

    /// `sum depth / contig length` for each contig that had at least one row.
    pub fn contig_coverage(&self) -> Vec<(String, f64)> {
        self.contigs
            .iter()
            .zip(&self.windows)
            .zip(&self.contig_depth)
            .filter(|((contig, windows), _)| contig.length > 0 && !windows.is_empty())
            .map(|((contig, _), &depth)| (contig.id.clone(), depth as f64 / contig.length as f64))
            .collect()
    }

    /// Deviation points in contig order, windows ascending, produced lazily.
    pub fn points<'a>(
        &'a self,
        style: &'a DeviationStyle,
    ) -> Result<impl Iterator<Item = WindowedPoint> + 'a> {
        let mean = self.mean_depth()?;
        let window = self.window;

        let points = self
            .contigs
            .iter()
            .zip(&self.windows)
            .flat_map(move |(contig, windows)| {
                windows.iter().map(move |(&idx, acc)| {
                    let start = idx * window;
                    // only the trailing window can be short
                    let end = (start + window).min(contig.length);
                    let window_mean = acc.depth_sum as f64 / (end - start) as f64;
                    let value = 100.0 * (window_mean - mean) / mean;
                    WindowedPoint {
                        contig: contig.id.clone(),
                        start,
                        end,
                        value,
                        color: style.color_for(value).to_string(),
                    }
                })
            });
        Ok(points)
    }
}

#[derive(Debug, Clone)]
pub struct CoverageTrack {
    pub mean_coverage: f64,
    pub contig_coverage: Vec<(String, f64)>,
    pub points: Vec<WindowedPoint>,
}

/// Read a depth file and build the coverage deviation track for `contigs`.
pub fn coverage_track(
    contigs: &[ContigLength],
    depth_path: &str,
    style: &DeviationStyle,
    diag: &dyn Diagnostics,
) -> Result<CoverageTrack> {
    let mut windows = CoverageWindows::new(contigs, style.window_size)?;
    let mut reader =
        DepthReader::open(depth_path)?.only_contigs(contigs.iter().map(|c| c.id.clone()));
    for row in reader.by_ref() {
        windows.add(&row?);
    }
    windows.skip_rows(reader.skipped_rows());

    if windows.skipped_rows() > 0 {
        diag.info(&format!(
            "Skipped {} coverage rows of contigs not in the genome",
            windows.skipped_rows()
        ));
    }
    if windows.rows_past_end() > 0 {
        diag.warn(&format!(
            "{} coverage rows are positioned beyond the end of their contig",
            windows.rows_past_end()
        ));
    }

    let points = windows.points(style)?.collect();
    Ok(CoverageTrack {
        mean_coverage: windows.mean_depth()?,
        contig_coverage: windows.contig_coverage(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CapturedDiagnostics;

    fn contigs(entries: &[(&str, usize)]) -> Vec<ContigLength> {
        entries
            .iter()
            .map(|&(id, length)| ContigLength {
                id: id.to_string(),
                length,
            })
            .collect()
    }

    fn row(contig: &str, position: usize, depth: u64) -> DepthRow {
        DepthRow {
            contig: contig.to_string(),
            position,
            depth,
        }
    }

    fn style(window: usize) -> DeviationStyle {
        DeviationStyle {
            pos_deviation_color: "dorange".to_string(),
            neg_deviation_color: "dblue".to_string(),
            window_size: window,
        }
    }

    #[test]
    fn test_window_deviation_and_partial_window() {
        let mut acc = CoverageWindows::new(&contigs(&[("c1", 15)]), 10).unwrap();
        for pos in 0..10 {
            acc.add(&row("c1", pos, 10));
        }
        for pos in 10..15 {
            acc.add(&row("c1", pos, 20));
        }

        // 100 + 100 over 15 bases
        let mean = acc.mean_depth().unwrap();
        assert!((mean - 200.0 / 15.0).abs() < 1e-9);

        let points: Vec<WindowedPoint> = acc.points(&style(10)).unwrap().collect();
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].start, points[0].end), (0, 10));
        assert_eq!(points[0].color, "dblue");
        // partial window divided by its 5 real bases
        assert_eq!((points[1].start, points[1].end), (10, 15));
        let expected = 100.0 * (20.0 - mean) / mean;
        assert!((points[1].value - expected).abs() < 1e-9);
        assert_eq!(points[1].color, "dorange");
    }

    #[test]
    fn test_unknown_contigs_skipped() {
        let mut acc = CoverageWindows::new(&contigs(&[("c1", 10)]), 5).unwrap();
        assert!(!acc.add(&row("plasmid", 0, 50)));
        assert!(acc.add(&row("c1", 0, 5)));
        assert_eq!(acc.skipped_rows(), 1);
        assert_eq!(acc.mean_depth().unwrap(), 5.0);
    }

    #[test]
    fn test_no_known_rows_is_invalid_input() {
        let mut acc = CoverageWindows::new(&contigs(&[("c1", 10)]), 5).unwrap();
        acc.add(&row("other", 0, 50));
        assert!(matches!(acc.mean_depth(), Err(TrackError::InvalidInput(_))));
        assert!(matches!(acc.points(&style(5)), Err(TrackError::InvalidInput(_))));
    }

    #[test]
    fn test_all_zero_depth_is_invalid_input() {
        let mut acc = CoverageWindows::new(&contigs(&[("c1", 3)]), 5).unwrap();
        for pos in 0..3 {
            acc.add(&row("c1", pos, 0));
        }
        assert!(matches!(acc.mean_depth(), Err(TrackError::InvalidInput(_))));
    }

    #[test]
    fn test_rows_past_end_count_but_emit_no_window() {
        let mut acc = CoverageWindows::new(&contigs(&[("c1", 5)]), 5).unwrap();
        for pos in 0..5 {
            acc.add(&row("c1", pos, 4));
        }
        acc.add(&row("c1", 7, 4));
        assert_eq!(acc.rows_past_end(), 1);

        let points: Vec<WindowedPoint> = acc.points(&style(5)).unwrap().collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 0.0);
    }

    #[test]
    fn test_rows_past_end_leave_trailing_window_alone() {
        let mut acc = CoverageWindows::new(&contigs(&[("c1", 8)]), 5).unwrap();
        for pos in 0..8 {
            acc.add(&row("c1", pos, 10));
        }
        assert!(acc.add(&row("c1", 9, 10)));
        assert_eq!(acc.rows_past_end(), 1);
        assert_eq!(acc.mean_depth().unwrap(), 10.0);

        let points: Vec<(usize, usize, f64)> = acc
            .points(&style(5))
            .unwrap()
            .map(|p| (p.start, p.end, p.value))
            .collect();
        assert_eq!(points, vec![(0, 5, 0.0), (5, 8, 0.0)]);
        assert_eq!(acc.contig_coverage(), vec![("c1".to_string(), 10.0)]);
    }

    #[test]
    fn test_points_are_lazy() {
        let mut acc = CoverageWindows::new(&contigs(&[("c1", 20), ("c2", 10)]), 5).unwrap();
        for pos in 0..20 {
            acc.add(&row("c1", pos, 2));
        }
        for pos in 0..10 {
            acc.add(&row("c2", pos, 4));
        }
        let st = style(5);
        let mut points = acc.points(&st).unwrap();
        let first = points.next().unwrap();
        assert_eq!((first.contig.as_str(), first.start, first.end), ("c1", 0, 5));
        assert_eq!(points.count(), 5);
    }

    #[test]
    fn test_contig_coverage() {
        let mut acc = CoverageWindows::new(&contigs(&[("c1", 4), ("c2", 8)]), 2).unwrap();
        for pos in 0..4 {
            acc.add(&row("c1", pos, 3));
        }
        assert_eq!(acc.contig_coverage(), vec![("c1".to_string(), 3.0)]);
    }

    #[test]
    fn test_coverage_track_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth.tsv");
        let mut text = String::new();
        for pos in 0..6 {
            text.push_str(&format!("c1\t{}\t{}\n", pos, if pos < 3 { 2 } else { 6 }));
        }
        text.push_str("unplaced\t0\t100\n");
        std::fs::write(&path, text).unwrap();

        let diag = CapturedDiagnostics::new();
        let track = coverage_track(
            &contigs(&[("c1", 6)]),
            path.to_str().unwrap(),
            &style(3),
            &diag,
        )
        .unwrap();

        assert_eq!(track.mean_coverage, 4.0);
        let values: Vec<f64> = track.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![-50.0, 50.0]);
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_header_and_unknown_contig_rows_skipped_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth.tsv");
        std::fs::write(
            &path,
            "contig\tpos\tdepth\nc1\t0\t5\nplasmid\tn/a\t-\nc1\t1\t5\n",
        )
        .unwrap();

        let diag = CapturedDiagnostics::new();
        let track = coverage_track(&contigs(&[("c1", 2)]), path.to_str().unwrap(), &style(5), &diag)
            .unwrap();
        assert_eq!(track.mean_coverage, 5.0);
        assert_eq!(track.points.len(), 1);
        assert!(diag
            .entries()
            .iter()
            .any(|(_, m)| m == "Skipped 2 coverage rows of contigs not in the genome"));
    }

    #[test]
    fn test_malformed_row_of_known_contig_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth.tsv");
        std::fs::write(&path, "c1\t0\t5\nc1\tone\t5\n").unwrap();

        let result = coverage_track(
            &contigs(&[("c1", 2)]),
            path.to_str().unwrap(),
            &style(5),
            &CapturedDiagnostics::new(),
        );
        assert!(matches!(result, Err(TrackError::MalformedRecord { line: 2, .. })));
    }
}

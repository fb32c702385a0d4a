//! rRNA / tRNA position tracks and per-product tallies.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::defaults::HYPOTHETICAL_PROTEINS;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::io::gff3::{FeatureRecord, FeatureType, GffReader};
use crate::style::PlotStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RrnaType {
    S5,
    S16,
    S23,
}

impl RrnaType {
    /// Classify an rRNA by the prefix of its product, e.g. `16S ribosomal RNA`.
    pub fn classify(product: &str) -> Option<Self> {
        if product.starts_with("5S") {
            Some(RrnaType::S5)
        } else if product.starts_with("16S") {
            Some(RrnaType::S16)
        } else if product.starts_with("23S") {
            Some(RrnaType::S23)
        } else {
            None
        }
    }
}

/// One marker of a position track; 1-based inclusive coordinates as in the annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturePoint {
    pub contig: String,
    pub start: u64,
    pub end: u64,
    pub symbol: String,
    pub color: String,
}

/// CDS features split by product; `num_cds = annotated + hypothetical`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CdsTally {
    pub annotated: usize,
    pub hypothetical: usize,
    /// CDS without a `product=` attribute, counted in neither total
    pub missing_product: usize,
}

impl CdsTally {
    pub fn total(&self) -> usize {
        self.annotated + self.hypothetical
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureTracks {
    pub rrna: Vec<FeaturePoint>,
    pub trna: Vec<FeaturePoint>,
    pub rrna_counts: BTreeMap<String, usize>,
    pub trna_counts: BTreeMap<String, usize>,
    pub cds: CdsTally,
}

impl FeatureTracks {
    pub fn total_trnas(&self) -> usize {
        self.trna_counts.values().sum()
    }

    /// Distinct amino acids among the tRNA labels, `tRNA-Lys(ttt)` -> `tRNA-Lys`.
    pub fn unique_amino_acids(&self) -> usize {
        self.trna_counts
            .keys()
            .map(|label| label.split('(').next().unwrap_or(label).trim())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

pub struct FeatureTrackBuilder<'a> {
    style: &'a PlotStyle,
    diag: &'a dyn Diagnostics,
    hypothetical: HashSet<String>,
    tracks: FeatureTracks,
}

impl<'a> FeatureTrackBuilder<'a> {
    pub fn new(style: &'a PlotStyle, diag: &'a dyn Diagnostics) -> Self {
        Self {
            style,
            diag,
            hypothetical: HYPOTHETICAL_PROTEINS.iter().map(|p| p.to_string()).collect(),
            tracks: FeatureTracks::default(),
        }
    }

    /// Replace the set of products counted as hypothetical proteins.
    pub fn hypothetical_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hypothetical = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn consume(&mut self, record: &FeatureRecord) {
        match record.feature_type {
            FeatureType::Cds => self.add_cds(record),
            FeatureType::Rrna => self.add_rrna(record),
            FeatureType::Trna => self.add_trna(record),
        }
    }

    pub fn finish(self) -> FeatureTracks {
        self.tracks
    }

    fn add_cds(&mut self, record: &FeatureRecord) {
        match &record.product {
            Some(product) if self.hypothetical.contains(product) => self.tracks.cds.hypothetical += 1,
            Some(_) => self.tracks.cds.annotated += 1,
            None => {
                self.diag
                    .warn(&format!("No CDS product in GFF file: {}", record.line));
                self.tracks.cds.missing_product += 1;
            }
        }
    }

    fn add_rrna(&mut self, record: &FeatureRecord) {
        let Some(product) = &record.product else {
            self.diag
                .warn(&format!("No rRNA product in GFF file: {}", record.line));
            return;
        };

        *self.tracks.rrna_counts.entry(product.clone()).or_insert(0) += 1;

        let style: &'a PlotStyle = self.style;
        let rrna = &style.rrna;
        let (symbol, color) = match RrnaType::classify(product) {
            Some(RrnaType::S5) => (&rrna.symbol_5s, &rrna.color_5s),
            Some(RrnaType::S16) => (&rrna.symbol_16s, &rrna.color_16s),
            Some(RrnaType::S23) => (&rrna.symbol_23s, &rrna.color_23s),
            None => {
                self.diag
                    .warn(&format!("Unknown rRNA product in GFF file: {}", product));
                return;
            }
        };

        self.tracks.rrna.push(FeaturePoint {
            contig: record.contig.clone(),
            start: record.start,
            end: record.end,
            symbol: symbol.clone(),
            color: color.clone(),
        });
    }

    fn add_trna(&mut self, record: &FeatureRecord) {
        let Some(product) = &record.product else {
            self.diag
                .warn(&format!("No tRNA product in GFF file: {}", record.line));
            return;
        };

        *self.tracks.trna_counts.entry(product.clone()).or_insert(0) += 1;
        self.tracks.trna.push(FeaturePoint {
            contig: record.contig.clone(),
            start: record.start,
            end: record.end,
            symbol: self.style.trna.symbol.clone(),
            color: self.style.trna.color.clone(),
        });
    }
}

/// Parse an annotation file once and build every feature track from it.
pub fn build_feature_tracks(
    path: &str,
    style: &PlotStyle,
    diag: &dyn Diagnostics,
) -> Result<FeatureTracks> {
    let mut builder = FeatureTrackBuilder::new(style, diag);
    for record in GffReader::open(path)? {
        builder.consume(&record?);
    }
    Ok(builder.finish())
}

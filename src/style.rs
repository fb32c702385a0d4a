//! Plot style: colors, symbols and window sizes written into the tracks.
//!
//! A style can be loaded from a TOML file with the sections `[contigs]`,
//! `[gc]`, `[coverage]`, `[rrna]` and `[trna]`. Every key is optional.

use crate::defaults::{COV_WINDOW_SIZE, GC_WINDOW_SIZE};
use crate::error::{Result, TrackError};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContigStyle {
    pub color: String,
    pub filtered_color: String,
    pub missing_color: String,
}

impl Default for ContigStyle {
    fn default() -> Self {
        Self {
            color: "green".to_string(),
            filtered_color: "grey".to_string(),
            missing_color: "red".to_string(),
        }
    }
}

/// Style of a windowed deviation track (GC or coverage).
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationStyle {
    pub pos_deviation_color: String,
    pub neg_deviation_color: String,
    pub window_size: usize,
}

impl DeviationStyle {
    fn with_window(window_size: usize) -> Self {
        Self {
            pos_deviation_color: "dorange".to_string(),
            neg_deviation_color: "dblue".to_string(),
            window_size,
        }
    }

    /// Color tag for a deviation value; zero counts as positive.
    pub fn color_for(&self, value: f64) -> &str {
        if value < 0.0 {
            &self.neg_deviation_color
        } else {
            &self.pos_deviation_color
        }
    }
}

fn default_gc_style() -> DeviationStyle {
    DeviationStyle::with_window(GC_WINDOW_SIZE)
}

fn default_cov_style() -> DeviationStyle {
    DeviationStyle::with_window(COV_WINDOW_SIZE)
}

/// Partial deviation section as written in a TOML file.
#[derive(Debug, Default, Deserialize)]
struct DeviationStyleFile {
    pos_deviation_color: Option<String>,
    neg_deviation_color: Option<String>,
    window_size: Option<usize>,
}

impl DeviationStyleFile {
    fn apply(self, mut base: DeviationStyle) -> DeviationStyle {
        if let Some(color) = self.pos_deviation_color {
            base.pos_deviation_color = color;
        }
        if let Some(color) = self.neg_deviation_color {
            base.neg_deviation_color = color;
        }
        if let Some(size) = self.window_size {
            base.window_size = size;
        }
        base
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RrnaStyle {
    #[serde(rename = "5S_symbol")]
    pub symbol_5s: String,
    #[serde(rename = "5S_color")]
    pub color_5s: String,
    #[serde(rename = "16S_symbol")]
    pub symbol_16s: String,
    #[serde(rename = "16S_color")]
    pub color_16s: String,
    #[serde(rename = "23S_symbol")]
    pub symbol_23s: String,
    #[serde(rename = "23S_color")]
    pub color_23s: String,
}

impl Default for RrnaStyle {
    fn default() -> Self {
        Self {
            symbol_5s: "C".to_string(),
            color_5s: "dgrey".to_string(),
            symbol_16s: "I".to_string(),
            color_16s: "dgrey".to_string(),
            symbol_23s: "O".to_string(),
            color_23s: "dgrey".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrnaStyle {
    pub symbol: String,
    pub color: String,
}

impl Default for TrnaStyle {
    fn default() -> Self {
        Self {
            symbol: "F".to_string(),
            color: "dred".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub contigs: ContigStyle,
    pub gc: DeviationStyle,
    pub coverage: DeviationStyle,
    pub rrna: RrnaStyle,
    pub trna: TrnaStyle,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            contigs: ContigStyle::default(),
            gc: default_gc_style(),
            coverage: default_cov_style(),
            rrna: RrnaStyle::default(),
            trna: TrnaStyle::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PlotStyleFile {
    #[serde(default)]
    contigs: ContigStyle,
    #[serde(default)]
    gc: DeviationStyleFile,
    #[serde(default)]
    coverage: DeviationStyleFile,
    #[serde(default)]
    rrna: RrnaStyle,
    #[serde(default)]
    trna: TrnaStyle,
}

impl PlotStyle {
    /// Parse a style from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: PlotStyleFile = toml::from_str(text)?;
        Ok(Self {
            contigs: file.contigs,
            gc: file.gc.apply(default_gc_style()),
            coverage: file.coverage.apply(default_cov_style()),
            rrna: file.rrna,
            trna: file.trna,
        })
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TrackError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

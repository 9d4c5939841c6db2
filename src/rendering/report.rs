//! Text report and JSON legend for a generated term map

use std::fmt::Write;

use color_terms::{CategoryCatalogue, CenterIndex, ClassifiedCube, Metric, Rgb8, SpaceId, Term};
use serde::{Deserialize, Serialize};

use crate::models::Variant;

/// Per-category outcome of a term map run
#[derive(Debug, Clone, PartialEq)]
pub struct TermSummary {
    pub index: u8,
    pub term: Term,
    pub display: Rgb8,
    /// Cube colors classified as this term
    pub count: u64,
    /// Representative color, `None` when the term owns no cube color
    pub center: Option<Rgb8>,
    /// Whether the display color itself classifies as this term
    pub consistent: bool,
}

/// Disagreement between the active metric and its counterpart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricComparison {
    pub counterpart: Metric,
    pub differences: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermMapReport {
    pub variant: Variant,
    pub space: SpaceId,
    pub metric: Metric,
    pub levels: usize,
    pub comparison: Option<MetricComparison>,
    /// Reference grid cells left empty by the chroma policy
    pub unresolved: usize,
    /// In catalogue index order
    pub terms: Vec<TermSummary>,
}

impl TermMapReport {
    pub fn build(
        variant: Variant,
        space: SpaceId,
        metric: Metric,
        catalogue: &CategoryCatalogue,
        cube: &ClassifiedCube,
        centers: &CenterIndex,
    ) -> Self {
        let counts = cube.counts(catalogue.categories().len());
        let terms = catalogue
            .categories()
            .iter()
            .zip(counts)
            .enumerate()
            .map(|(index, (category, count))| {
                let index = index as u8;
                TermSummary {
                    index,
                    term: category.term,
                    display: category.display,
                    count,
                    center: centers.get(index),
                    consistent: cube.lookup(category.display) == index,
                }
            })
            .collect();
        Self {
            variant,
            space,
            metric,
            levels: cube.levels(),
            comparison: None,
            unresolved: 0,
            terms,
        }
    }

    pub fn with_comparison(mut self, comparison: Option<MetricComparison>) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn with_unresolved(mut self, unresolved: usize) -> Self {
        self.unresolved = unresolved;
        self
    }

    /// Terms by descending count; equal counts by descending label
    pub fn ranked(&self) -> Vec<&TermSummary> {
        let mut ranked: Vec<&TermSummary> = self.terms.iter().collect();
        ranked.sort_by(|a, b| {
            (b.count, b.term.label()).cmp(&(a.count, a.term.label()))
        });
        ranked
    }

    /// Terms whose display color lands in another term's region
    pub fn inconsistent(&self) -> impl Iterator<Item = &TermSummary> {
        self.terms.iter().filter(|t| !t.consistent)
    }

    /// Human-readable report, optionally with true-color swatches
    pub fn render(&self, ansi: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} term map ({}, {}, {} levels)",
            self.variant.name().to_ascii_uppercase(),
            self.space,
            self.metric,
            self.levels
        );
        let labels: Vec<String> = self.terms.iter().map(|t| t.term.label()).collect();
        let _ = writeln!(out, "Terms: {}", labels.join(", "));
        if self.unresolved > 0 {
            let _ = writeln!(out, "Unresolved grid cells: {}", self.unresolved);
        }
        let _ = writeln!(out);

        for summary in self.ranked() {
            let _ = writeln!(out, "{:8} {:8}", summary.term.label(), summary.count);
        }
        if let Some(comparison) = self.comparison {
            let _ = writeln!(
                out,
                "{} vs {}: {} colors differ",
                self.metric, comparison.counterpart, comparison.differences
            );
        }
        let _ = writeln!(out);

        for summary in &self.terms {
            let center = summary
                .center
                .map(hex_code)
                .unwrap_or_else(|| "------".to_string());
            let _ = write!(out, "{} {}", center, hex_code(summary.display));
            if ansi {
                let _ = write!(
                    out,
                    " {} {}",
                    summary.center.map(swatch).unwrap_or_else(|| "  ".to_string()),
                    swatch(summary.display)
                );
            }
            let _ = writeln!(out, " {:8} {}", summary.term.name(), summary.consistent);
        }
        out
    }

    /// Legend written next to the rasters
    pub fn legend(&self) -> Legend {
        Legend {
            variant: self.variant,
            working_space: self.space.key().to_string(),
            metric: self.metric.to_string(),
            levels: self.levels,
            terms: self
                .terms
                .iter()
                .map(|t| LegendEntry {
                    index: t.index,
                    term: t.term.name().to_string(),
                    display: hex_code(t.display),
                    count: t.count,
                    center: t.center.map(hex_code),
                })
                .collect(),
        }
    }
}

/// Category names and colors of a term map raster, by pixel value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub variant: Variant,
    pub working_space: String,
    pub metric: String,
    pub levels: usize,
    pub terms: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub index: u8,
    pub term: String,
    /// Uppercase hex without '#'
    pub display: String,
    pub count: u64,
    #[serde(default)]
    pub center: Option<String>,
}

/// `RRGGBB` in uppercase
pub fn hex_code(rgb: Rgb8) -> String {
    hex::encode_upper(rgb.to_bytes())
}

/// Two-cell ANSI true-color background swatch
pub fn swatch(rgb: Rgb8) -> String {
    format!("\x1b[48;2;{};{};{}m  \x1b[49m", rgb.r, rgb.g, rgb.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_terms::{find_centers, Lab};

    fn two_term_report() -> TermMapReport {
        let catalogue = CategoryCatalogue::from_lab(&[
            (Term::Black, Lab::new(0.0, 0.0, 0.0)),
            (Term::White, Lab::new(100.0, 0.0, 0.0)),
        ])
        .unwrap();
        // levels 2: only (1,1,1) is white.
        let mut indices = vec![0u8; 8];
        indices[7] = 1;
        let cube = ClassifiedCube::from_raw(2, indices).unwrap();
        let centers = find_centers(&cube);
        TermMapReport::build(
            Variant::Bct11,
            SpaceId::Srgb,
            Metric::Cie76,
            &catalogue,
            &cube,
            &centers,
        )
    }

    #[test]
    fn test_counts_and_consistency() {
        let report = two_term_report();
        assert_eq!(report.terms.len(), 2);
        assert_eq!(report.terms[0].count, 7);
        assert_eq!(report.terms[1].count, 1);
        assert!(report.terms.iter().all(|t| t.consistent));
        assert_eq!(report.terms[1].center, Some(Rgb8::new(255, 255, 255)));
        assert_eq!(report.inconsistent().count(), 0);
    }

    #[test]
    fn test_ranked_by_count_then_label() {
        let mut report = two_term_report();
        assert_eq!(report.ranked()[0].term, Term::Black);
        report.terms[0].count = 1;
        // Equal counts: "White" sorts before "Black" in descending order.
        assert_eq!(report.ranked()[0].term, Term::White);
    }

    #[test]
    fn test_render_plain() {
        let report = two_term_report().with_comparison(Some(MetricComparison {
            counterpart: Metric::Ciede2000,
            differences: 3,
        }));
        let text = report.render(false);
        assert!(text.starts_with("BCT11 term map (srgb, CIE76, 2 levels)\n"));
        assert!(text.contains("Terms: Black, White\n"));
        assert!(text.contains("Black           7\n"));
        assert!(text.contains("CIE76 vs CIEDE2000: 3 colors differ\n"));
        assert!(text.contains("FFFFFF FFFFFF white    true\n"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_render_ansi_swatches() {
        let text = two_term_report().render(true);
        assert!(text.contains("\x1b[48;2;255;255;255m  \x1b[49m"));
    }

    #[test]
    fn test_legend_entries() {
        let legend = two_term_report().legend();
        assert_eq!(legend.terms[1].term, "white");
        assert_eq!(legend.terms[1].display, "FFFFFF");
        assert_eq!(legend.terms[1].center.as_deref(), Some("FFFFFF"));
        let json = serde_json::to_string(&legend).unwrap();
        assert!(json.contains("\"variant\":\"bct11\""));
    }

    #[test]
    fn test_hex_code() {
        assert_eq!(hex_code(Rgb8::new(0xE8, 0x7D, 0x53)), "E87D53");
    }
}

use super::record::DesignRecord;
use crate::core::models::evaluation::{AmpRecommendation, score};
use std::io::{self, Write};

/// Number of designs listed in the ranked section of the report.
pub const TOP_DESIGNS: usize = 10;

const SUMMARY_METRICS: [(&str, &str); 6] = [
    (score::AMP, "AMP score"),
    (score::STABILITY, "Stability score"),
    (score::SOLUBILITY, "Solubility score"),
    (score::NET_CHARGE, "Net charge"),
    (score::HYDROPHOBICITY, "Hydrophobicity (GRAVY)"),
    (score::LENGTH, "Length"),
];

fn fmt_score(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

fn fmt_summary_row(name: &str, values: &[f64]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(format!("| {name} | {mean:.3} | {min:.3} | {max:.3} |"))
}

/// Writes a human-readable Markdown summary of `records`.
///
/// The report is write-only; it is not meant to be parsed back.
pub fn write_report(records: &[DesignRecord], title: &str, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "# Peptide Design Report: {title}")?;
    writeln!(writer)?;
    writeln!(writer, "Total designs: {}", records.len())?;
    writeln!(writer)?;

    writeln!(writer, "## Summary")?;
    writeln!(writer)?;
    writeln!(writer, "| Metric | Mean | Min | Max |")?;
    writeln!(writer, "|---|---|---|---|")?;
    for (key, label) in SUMMARY_METRICS {
        let values: Vec<f64> = records.iter().filter_map(|r| r.scores.get(key).copied()).collect();
        if let Some(row) = fmt_summary_row(label, &values) {
            writeln!(writer, "{row}")?;
        }
    }
    writeln!(writer)?;

    let amp_scores: Vec<f64> = records
        .iter()
        .filter_map(|r| r.scores.get(score::AMP).copied())
        .collect();
    if !amp_scores.is_empty() {
        let count = |tier: AmpRecommendation| {
            amp_scores
                .iter()
                .filter(|&&s| AmpRecommendation::from_score(s) == tier)
                .count()
        };
        writeln!(writer, "## Antimicrobial Potential")?;
        writeln!(writer)?;
        writeln!(writer, "- High (score > 0.7): {}", count(AmpRecommendation::High))?;
        writeln!(writer, "- Moderate (score > 0.4): {}", count(AmpRecommendation::Moderate))?;
        writeln!(writer, "- Low: {}", count(AmpRecommendation::Low))?;
        writeln!(writer)?;

        let mut ranked: Vec<&DesignRecord> = records
            .iter()
            .filter(|r| r.scores.contains_key(score::AMP))
            .collect();
        ranked.sort_by(|a, b| b.scores[score::AMP].total_cmp(&a.scores[score::AMP]));

        writeln!(writer, "## Top Designs")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "| Rank | ID | Sequence | AMP | Stability | Solubility | Recommendation |"
        )?;
        writeln!(writer, "|---|---|---|---|---|---|---|")?;
        for (rank, record) in ranked.iter().take(TOP_DESIGNS).enumerate() {
            let amp = record.scores[score::AMP];
            writeln!(
                writer,
                "| {} | {} | `{}` | {:.3} | {} | {} | {} |",
                rank + 1,
                record.id,
                record.sequence,
                amp,
                fmt_score(record.scores.get(score::STABILITY).copied()),
                fmt_score(record.scores.get(score::SOLUBILITY).copied()),
                AmpRecommendation::from_score(amp),
            )?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "## All Designs")?;
    writeln!(writer)?;
    writeln!(writer, "| ID | Method | Length | Net charge | pI | Sequence |")?;
    writeln!(writer, "|---|---|---|---|---|---|")?;
    for record in records {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} | `{}` |",
            record.id,
            record.method,
            record.sequence.len(),
            fmt_score(record.scores.get(score::NET_CHARGE).copied()),
            fmt_score(record.scores.get(score::ISOELECTRIC_POINT).copied()),
            record.sequence,
        )?;
    }
    Ok(())
}

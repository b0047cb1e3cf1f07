use super::error::ExportError;
use super::record::{DesignRecord, score_columns};
use super::traits::DesignFile;
use crate::core::models::candidate::GenerationMethod;
use crate::core::models::sequence::Sequence;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

const FIXED_COLUMNS: [&str; 4] = ["id", "sequence", "method", "constraints"];
const FORMAT: &str = "CSV";

/// One row per design: identity columns followed by one column per score name.
/// A design lacking a score leaves that cell empty.
pub struct CsvFile;

impl DesignFile for CsvFile {
    type Options = ();
    type Error = ExportError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<DesignRecord>, Self::Error> {
        let mut csv = csv::Reader::from_reader(reader);
        let headers = csv.headers()?.clone();

        for (i, expected) in FIXED_COLUMNS.iter().enumerate() {
            if headers.get(i) != Some(*expected) {
                return Err(ExportError::Parse {
                    format: FORMAT,
                    line: 1,
                    reason: format!("expected column '{expected}' at position {}", i + 1),
                });
            }
        }
        let score_names: Vec<&str> = headers.iter().skip(FIXED_COLUMNS.len()).collect();

        let mut records = Vec::new();
        for (index, row) in csv.records().enumerate() {
            let row = row?;
            let line = index + 2;
            let parse_error = |reason: String| ExportError::Parse {
                format: FORMAT,
                line,
                reason,
            };

            let sequence = Sequence::parse(&row[1]).map_err(|e| parse_error(e.to_string()))?;
            let method = row[2]
                .parse::<GenerationMethod>()
                .map_err(|e| parse_error(e.to_string()))?;

            let mut scores = BTreeMap::new();
            for (name, cell) in score_names.iter().zip(row.iter().skip(FIXED_COLUMNS.len())) {
                if cell.is_empty() {
                    continue;
                }
                let value = cell
                    .parse::<f64>()
                    .map_err(|_| parse_error(format!("invalid value '{cell}' for score '{name}'")))?;
                scores.insert(name.to_string(), value);
            }

            records.push(DesignRecord {
                id: row[0].to_string(),
                sequence,
                method,
                constraints: row[3].to_string(),
                scores,
            });
        }
        Ok(records)
    }

    fn write_to(
        records: &[DesignRecord],
        _options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let columns = score_columns(records);
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record(FIXED_COLUMNS.iter().copied().chain(columns.iter().map(String::as_str)))?;
        for record in records {
            let mut row = vec![
                record.id.clone(),
                record.sequence.to_string(),
                record.method.to_string(),
                record.constraints.clone(),
            ];
            row.extend(
                columns
                    .iter()
                    .map(|name| record.scores.get(name).map(f64::to_string).unwrap_or_default()),
            );
            csv.write_record(&row)?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(id: &str, seq: &str, scores: &[(&str, f64)]) -> DesignRecord {
        DesignRecord {
            id: id.to_string(),
            sequence: Sequence::parse(seq).unwrap(),
            method: GenerationMethod::Antimicrobial,
            constraints: "length=10..=30;target=antimicrobial".to_string(),
            scores: scores.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn write(records: &[DesignRecord]) -> String {
        let mut buffer = Vec::new();
        CsvFile::write_to(records, &(), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn write_emits_header_and_one_row_per_design() {
        let text = write(&[
            record("a_001", "KALK", &[("amp_score", 0.75), ("length", 4.0)]),
            record("a_002", "DDDD", &[("amp_score", 0.1), ("length", 4.0)]),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,sequence,method,constraints,amp_score,length");
        assert_eq!(
            lines[1],
            "a_001,KALK,antimicrobial,length=10..=30;target=antimicrobial,0.75,4"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn artifact_reads_back_losslessly() {
        let records = vec![
            record("a_001", "KALKKKLLKALKKK", &[("amp_score", 0.812_345_678_901_234_5)]),
            record("a_002", "GIGKFLHSAKKFGKAFVGEIMNS", &[("amp_score", 1.0 / 3.0), ("net_charge", -2.9)]),
        ];
        let text = write(&records);
        let parsed = CsvFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn missing_scores_become_empty_cells_and_stay_absent() {
        let records = vec![
            record("a_001", "KALK", &[("amp_score", 0.5)]),
            record("a_002", "DDDD", &[("stability_score", 0.25)]),
        ];
        let text = write(&records);
        assert!(text.lines().nth(1).unwrap().ends_with("0.5,"));
        let parsed = CsvFile::read_from(&mut Cursor::new(text)).unwrap();
        assert!(!parsed[0].scores.contains_key("stability_score"));
        assert_eq!(parsed, records);
    }

    #[test]
    fn read_rejects_unknown_header_layout() {
        let text = "name,sequence,method,constraints\nx,KALK,uniform,\n";
        let err = CsvFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, ExportError::Parse { line: 1, .. }));
    }

    #[test]
    fn read_reports_line_of_invalid_sequence() {
        let text = "id,sequence,method,constraints\nx,KALK,uniform,\ny,X1Z,uniform,\n";
        let err = CsvFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, ExportError::Parse { line: 3, .. }));
    }

    #[test]
    fn read_rejects_non_numeric_score() {
        let text = "id,sequence,method,constraints,amp_score\nx,KALK,uniform,,high\n";
        assert!(matches!(
            CsvFile::read_from(&mut Cursor::new(text)),
            Err(ExportError::Parse { line: 2, .. })
        ));
    }
}

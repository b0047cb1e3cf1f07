use super::error::ExportError;
use super::record::DesignRecord;
use super::traits::DesignFile;
use crate::core::models::candidate::GenerationMethod;
use crate::core::models::sequence::Sequence;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

const FORMAT: &str = "FASTA";
const METHOD_KEY: &str = "method";
const CONSTRAINTS_KEY: &str = "constraints";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastaOptions {
    pub line_width: usize,
}

impl Default for FastaOptions {
    fn default() -> Self {
        Self { line_width: 60 }
    }
}

/// FASTA with `key=value` annotations in the header line:
///
/// ```text
/// >amp_001 method=antimicrobial constraints=length=10..=30 amp_score=0.81
/// KALKKKLLKALKKK
/// ```
///
/// Header tokens are whitespace separated, so whitespace inside constraint
/// strings is written as `_`. Identifiers are kept intact: whitespace and `%`
/// are percent-encoded (`my run_001` is written as `my%20run_001`).
pub struct FastaFile;

fn encode_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        if c == '%' || c.is_whitespace() {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Reverses [`encode_id`]. A `%` not followed by two hex digits is kept as is,
/// so identifiers from plain FASTA files read unchanged.
fn decode_id(token: &str) -> Option<String> {
    let bytes = token.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = (bytes[i] == b'%')
            .then(|| token.get(i + 1..i + 3))
            .flatten()
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

struct PendingRecord {
    line: usize,
    id: String,
    method: GenerationMethod,
    constraints: String,
    scores: BTreeMap<String, f64>,
    residues: String,
}

impl PendingRecord {
    fn from_header(header: &str, line: usize) -> Result<Self, ExportError> {
        let parse_error = |reason: String| ExportError::Parse {
            format: FORMAT,
            line,
            reason,
        };
        let mut tokens = header.split_whitespace();
        let token = tokens
            .next()
            .ok_or_else(|| parse_error("header has no identifier".to_string()))?;
        let id = decode_id(token)
            .ok_or_else(|| parse_error(format!("identifier '{token}' is not valid UTF-8")))?;

        let mut record = Self {
            line,
            id,
            method: GenerationMethod::External,
            constraints: String::new(),
            scores: BTreeMap::new(),
            residues: String::new(),
        };
        for token in tokens {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| parse_error(format!("annotation '{token}' is not key=value")))?;
            match key {
                METHOD_KEY => {
                    record.method = value
                        .parse::<GenerationMethod>()
                        .map_err(|e| parse_error(e.to_string()))?;
                }
                CONSTRAINTS_KEY => record.constraints = value.to_string(),
                _ => {
                    let score = value.parse::<f64>().map_err(|_| {
                        parse_error(format!("invalid value '{value}' for score '{key}'"))
                    })?;
                    record.scores.insert(key.to_string(), score);
                }
            }
        }
        Ok(record)
    }

    fn finish(self) -> Result<DesignRecord, ExportError> {
        let sequence = Sequence::parse(&self.residues).map_err(|e| ExportError::Parse {
            format: FORMAT,
            line: self.line,
            reason: format!("record '{}': {e}", self.id),
        })?;
        Ok(DesignRecord {
            id: self.id,
            sequence,
            method: self.method,
            constraints: self.constraints,
            scores: self.scores,
        })
    }
}

impl DesignFile for FastaFile {
    type Options = FastaOptions;
    type Error = ExportError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<DesignRecord>, Self::Error> {
        let mut records = Vec::new();
        let mut pending: Option<PendingRecord> = None;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(header) = trimmed.strip_prefix('>') {
                if let Some(done) = pending.take() {
                    records.push(done.finish()?);
                }
                pending = Some(PendingRecord::from_header(header, line_no)?);
            } else if let Some(current) = pending.as_mut() {
                current.residues.push_str(trimmed);
            } else {
                return Err(ExportError::Parse {
                    format: FORMAT,
                    line: line_no,
                    reason: "sequence data before the first header".to_string(),
                });
            }
        }
        if let Some(done) = pending {
            records.push(done.finish()?);
        }
        Ok(records)
    }

    fn write_to(
        records: &[DesignRecord],
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let width = options.line_width.max(1);
        for record in records {
            write!(
                writer,
                ">{} {METHOD_KEY}={}",
                encode_id(&record.id),
                record.method
            )?;
            let constraints: String = record
                .constraints
                .chars()
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect();
            write!(writer, " {CONSTRAINTS_KEY}={constraints}")?;
            for (name, value) in &record.scores {
                write!(writer, " {name}={value}")?;
            }
            writeln!(writer)?;

            let text = record.sequence.to_string();
            for chunk in text.as_bytes().chunks(width) {
                writer.write_all(chunk)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(id: &str, seq: &str) -> DesignRecord {
        DesignRecord {
            id: id.to_string(),
            sequence: Sequence::parse(seq).unwrap(),
            method: GenerationMethod::Diverse,
            constraints: "length=10;min-distance=0.3;metric=Hamming".to_string(),
            scores: [
                ("amp_score".to_string(), 0.8125),
                ("net_charge".to_string(), -1.9),
            ]
            .into_iter()
            .collect(),
        }
    }

    fn write(records: &[DesignRecord], width: usize) -> String {
        let mut buffer = Vec::new();
        FastaFile::write_to(records, &FastaOptions { line_width: width }, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn header_carries_key_value_annotations() {
        let text = write(&[record("d_001", "KALK")], 60);
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            ">d_001 method=diverse constraints=length=10;min-distance=0.3;metric=Hamming amp_score=0.8125 net_charge=-1.9"
        );
    }

    #[test]
    fn sequence_lines_wrap_at_configured_width() {
        let text = write(&[record("d_001", "ACDEFGHIKLMNPQRSTVWY")], 8);
        let body: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(body, ["ACDEFGHI", "KLMNPQRS", "TVWY"]);
    }

    #[test]
    fn artifact_reads_back_losslessly() {
        let records = vec![
            record("d_001", "ACDEFGHIKLMNPQRSTVWYACDEFGHIKLMNPQRSTVWY"),
            record("d_002", "KALKKKLLKALKKK"),
        ];
        let parsed = FastaFile::read_from(&mut Cursor::new(write(&records, 7))).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn whitespace_in_constraints_is_replaced() {
        let mut r = record("d_001", "KALK");
        r.constraints = "free text".to_string();
        let text = write(&[r], 60);
        assert!(text.contains("constraints=free_text "));
    }

    #[test]
    fn identifiers_with_whitespace_read_back_intact() {
        let records = vec![record("my run_001", "KALK"), record("50%\tdone", "DDDD")];
        let text = write(&records, 60);
        assert!(text.starts_with(">my%20run_001 method=diverse "));
        assert!(text.contains(">50%25%09done "));
        let parsed = FastaFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn stray_percent_in_plain_identifiers_is_kept() {
        let text = ">cut%off\nKALK\n>a%+1\nKALK\n";
        let parsed = FastaFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(parsed[0].id, "cut%off");
        assert_eq!(parsed[1].id, "a%+1");
    }

    #[test]
    fn plain_fasta_reads_as_external_designs() {
        let text = ">seq1\nKALK\nKALK\n\n>seq2 some_score=1.5\nDDDD\n";
        let parsed = FastaFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].sequence.to_string(), "KALKKALK");
        assert_eq!(parsed[0].method, GenerationMethod::External);
        assert_eq!(parsed[1].scores.get("some_score"), Some(&1.5));
    }

    #[test]
    fn data_before_header_is_rejected() {
        let err = FastaFile::read_from(&mut Cursor::new("KALK\n>x\nKALK\n")).unwrap_err();
        assert!(matches!(err, ExportError::Parse { line: 1, .. }));
    }

    #[test]
    fn invalid_residues_report_header_line() {
        let err = FastaFile::read_from(&mut Cursor::new(">ok\nKALK\n>bad\nX1Z\n")).unwrap_err();
        assert!(matches!(err, ExportError::Parse { line: 3, .. }));
    }
}

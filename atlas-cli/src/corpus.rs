//! Corpus loading from CSV or JSON files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use atlas_core::{Corpus, NarrationRecord};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Columns every corpus must provide. The unit column may also be named
/// `unit_id`.
pub const REQUIRED_COLUMNS: [&str; 5] = ["hadith_key", "source", "ref", "isnad", "matn"];

const UNIT_COLUMN_ALIASES: [&str; 2] = ["hadith_key", "unit_id"];

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corpus is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("json corpus must be an array of objects (row {row})")]
    NotAnObject { row: usize },

    #[error("unsupported corpus format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Load a corpus snapshot, choosing the parser by file extension.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Corpus, CorpusError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let corpus = match extension.as_deref() {
        Some("csv") => parse_csv(File::open(path)?)?,
        Some("json") => parse_json(File::open(path)?)?,
        _ => return Err(CorpusError::UnsupportedFormat(path.to_path_buf())),
    };

    info!(path = %path.display(), records = corpus.len(), "corpus loaded");
    Ok(corpus)
}

struct ColumnIndex {
    unit: usize,
    source: usize,
    reference: usize,
    isnad: usize,
    matn: usize,
}

impl ColumnIndex {
    fn resolve<'h>(headers: impl Iterator<Item = &'h str> + Clone) -> Result<Self, CorpusError> {
        let find = |name: &str| headers.clone().position(|h| h.trim() == name);
        let unit = UNIT_COLUMN_ALIASES.iter().find_map(|alias| find(*alias));

        let mut missing = Vec::new();
        let mut require = |found: Option<usize>, name: &str| {
            if found.is_none() {
                missing.push(name.to_string());
            }
            found.unwrap_or_default()
        };

        let index = ColumnIndex {
            unit: require(unit, REQUIRED_COLUMNS[0]),
            source: require(find("source"), "source"),
            reference: require(find("ref"), "ref"),
            isnad: require(find("isnad"), "isnad"),
            matn: require(find("matn"), "matn"),
        };

        if missing.is_empty() {
            Ok(index)
        } else {
            Err(CorpusError::Schema { missing })
        }
    }
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Corpus, CorpusError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(headers.iter())?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cell = |idx: usize| row.get(idx).unwrap_or_default().to_string();
        records.push(NarrationRecord::new(
            cell(columns.unit),
            cell(columns.source),
            cell(columns.reference),
            cell(columns.isnad),
            cell(columns.matn),
        ));
    }
    Ok(Corpus::new(records))
}

/// Parse a JSON array of row objects. Every row must carry every column;
/// null values are read as empty text.
pub fn parse_json<R: Read>(reader: R) -> Result<Corpus, CorpusError> {
    let rows: Vec<Value> = serde_json::from_reader(reader)?;
    let mut records = Vec::with_capacity(rows.len());

    for (row, value) in rows.iter().enumerate() {
        let object = value.as_object().ok_or(CorpusError::NotAnObject { row })?;
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        let columns = ColumnIndex::resolve(keys.iter().copied())?;

        let cell = |idx: usize| match &object[keys[idx]] {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        records.push(NarrationRecord::new(
            cell(columns.unit),
            cell(columns.source),
            cell(columns.reference),
            cell(columns.isnad),
            cell(columns.matn),
        ));
    }
    Ok(Corpus::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
hadith_key,source,ref,isnad,matn
h1,bukhari,1,\"حدثنا الحميدي، قال: حدثنا سفيان\",إنما الأعمال بالنيات
h1,muslim,1907,حدثنا القعنبي,إنما الأعمال بالنية
";

    #[test]
    fn parses_csv_rows_in_order() {
        let corpus = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 2);
        let first = &corpus.records()[0];
        assert_eq!(first.unit_id, "h1");
        assert_eq!(first.isnad, "حدثنا الحميدي، قال: حدثنا سفيان");
        assert_eq!(corpus.records()[1].position, 1);
    }

    #[test]
    fn accepts_unit_id_column_in_any_order() {
        let csv = "matn,isnad,ref,source,unit_id\nمتن,سند,7,malik,u9\n";
        let corpus = parse_csv(csv.as_bytes()).unwrap();
        let record = &corpus.records()[0];
        assert_eq!(record.unit_id, "u9");
        assert_eq!(record.source, "malik");
        assert_eq!(record.reference, "7");
    }

    #[test]
    fn reports_every_missing_column() {
        let err = parse_csv("hadith_key,source\nh1,bukhari\n".as_bytes()).unwrap_err();
        match err {
            CorpusError::Schema { missing } => assert_eq!(missing, vec!["ref", "isnad", "matn"]),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parses_json_rows() {
        let json = r#"[
            {"unit_id": "h1", "source": "bukhari", "ref": 1, "isnad": "حدثنا مالك", "matn": "متن"},
            {"hadith_key": "h2", "source": "muslim", "ref": "2", "isnad": null, "matn": "متن"}
        ]"#;
        let corpus = parse_json(json.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[0].reference, "1");
        assert_eq!(corpus.records()[1].unit_id, "h2");
        assert_eq!(corpus.records()[1].isnad, "");
    }

    #[test]
    fn json_row_missing_a_column_is_a_schema_error() {
        let json = r#"[{"unit_id": "h1", "source": "s", "ref": "1", "isnad": "i"}]"#;
        assert!(matches!(
            parse_json(json.as_bytes()),
            Err(CorpusError::Schema { missing }) if missing == vec!["matn".to_string()]
        ));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.xlsx");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            load_corpus(&path),
            Err(CorpusError::UnsupportedFormat(_))
        ));
    }
}

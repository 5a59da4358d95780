use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::error::{LoadError, Result};
use crate::models::{Category, DegreeLevel, Entry, ParseLabelError};

pub const REQUIRED_COLUMNS: [&str; 5] = ["Date", "Feeling", "Story", "Category", "Degree"];

#[derive(Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Feeling")]
    feeling: String,
    #[serde(rename = "Story")]
    story: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Degree")]
    degree: String,
}

pub fn load_entries(csv_path: &Path) -> Result<Vec<Entry>> {
    let file = std::fs::File::open(csv_path)?;
    let entries = read_entries(file)?;
    log::info!("Loaded {} entries from {}", entries.len(), csv_path.display());
    Ok(entries)
}

pub fn read_entries<R: Read>(input: R) -> Result<Vec<Entry>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let headers = reader.headers()?;
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::Schema { missing });
    }

    let mut entries = Vec::new();
    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let line = index + 1;

        let degree: DegreeLevel = row
            .degree
            .parse()
            .map_err(|err: ParseLabelError| LoadError::UnknownDegree {
                row: line,
                value: err.value,
            })?;
        let category: Category = row
            .category
            .parse()
            .map_err(|err: ParseLabelError| LoadError::UnknownCategory {
                row: line,
                value: err.value,
            })?;

        entries.push(Entry {
            date: row.date,
            feeling: row.feeling,
            story: row.story,
            category,
            degree,
        });
    }

    log::debug!("Parsed {} rows", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Date,Feeling,Story,Category,Degree
3-Jan-24,sad,\"Watched an old film, cried at the end\",Visual Media,Light
5-Jan-24,homesick,Call with mum,Family,Medium
2-Feb-24,overwhelmed,Everything at once,Crisis,Heavy
";

    #[test]
    fn parses_rows_in_file_order() {
        let entries = read_entries(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date, "3-Jan-24");
        assert_eq!(entries[0].story, "Watched an old film, cried at the end");
        assert_eq!(entries[0].category, Category::VisualMedia);
        assert_eq!(entries[1].degree, DegreeLevel::Medium);
        assert_eq!(entries[2].category, Category::Crisis);
    }

    #[test]
    fn ignores_extra_columns_and_whitespace() {
        let input = "Notes, Date ,Feeling,Story,Category,Degree\n\
                     x, 7-Mar-24 ,calm,,Music , Light\n";
        let entries = read_entries(input.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, "7-Mar-24");
        assert_eq!(entries[0].story, "");
        assert_eq!(entries[0].category, Category::Music);
        assert_eq!(entries[0].degree, DegreeLevel::Light);
    }

    #[test]
    fn reports_every_missing_column() {
        let input = "Date,Feeling,Degree\n3-Jan-24,sad,Light\n";
        match read_entries(input.as_bytes()) {
            Err(LoadError::Schema { missing }) => {
                assert_eq!(missing, vec!["Story".to_string(), "Category".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_degree_with_row_number() {
        let input = "Date,Feeling,Story,Category,Degree\n\
                     3-Jan-24,sad,story,Music,Light\n\
                     4-Jan-24,sad,story,Music,Extreme\n";
        match read_entries(input.as_bytes()) {
            Err(LoadError::UnknownDegree { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "Extreme");
            }
            other => panic!("expected unknown degree, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_category() {
        let input = "Date,Feeling,Story,Category,Degree\n3-Jan-24,sad,story,Work,Heavy\n";
        let err = read_entries(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownCategory { row: 1, .. }));
        assert_eq!(err.to_string(), "row 1: unknown category `Work`");
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let entries = load_entries(file.path()).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_entries(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}

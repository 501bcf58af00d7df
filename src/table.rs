use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

pub const COL_TITLE: &str = "Title";
pub const COL_COMPANY: &str = "Société";
pub const COL_RELEVANT: &str = "Pertinent";
pub const COL_COMMENT: &str = "Commentaire";

pub const TRAINING_COLUMNS: [&str; 4] = [COL_TITLE, COL_COMPANY, COL_RELEVANT, COL_COMMENT];
pub const TARGET_COLUMNS: [&str; 3] = [COL_TITLE, COL_COMPANY, COL_RELEVANT];

/// An in-memory CSV table. Every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Indices of `names`, in order. Fails on the first missing column.
    pub fn require_columns(&self, names: &[&str], source: &Path) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| match self.column(name) {
                Some(i) => Ok(i),
                None => bail!("missing column `{}` in {}", name, source.display()),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row][col].as_str()
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) {
        self.rows[row][col] = value.into();
    }
}

/// One labelled article of the training table.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Société")]
    pub company: String,
    #[serde(rename = "Pertinent")]
    pub relevant: String,
    #[serde(rename = "Commentaire")]
    pub comment: String,
}

/// Read a comma-separated, `"`-quoted CSV with a header row.
///
/// Rows with more cells than the header or with invalid UTF-8 are skipped;
/// short rows are padded with empty cells.
pub fn read_table(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    ensure!(!headers.is_empty(), "{} has no header row", path.display());

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(e).with_context(|| format!("read {}", path.display()));
            }
            Err(e) => {
                debug!("skipping malformed record {} in {}: {}", line + 1, path.display(), e);
                continue;
            }
        };
        if record.len() > headers.len() {
            debug!(
                "skipping record {} in {}: {} fields, expected {}",
                line + 1,
                path.display(),
                record.len(),
                headers.len()
            );
            continue;
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

/// Load the training table and check its schema.
pub fn read_training(path: &Path) -> Result<Vec<TrainingRow>> {
    let table = read_table(path)?;
    table.require_columns(&TRAINING_COLUMNS, path)?;

    let header = csv::StringRecord::from(table.headers.clone());
    let mut out = Vec::with_capacity(table.len());
    for row in &table.rows {
        let record = csv::StringRecord::from(row.clone());
        match record.deserialize::<TrainingRow>(Some(&header)) {
            Ok(r) => out.push(r),
            Err(e) => debug!("skipping training row: {}", e),
        }
    }
    Ok(out)
}

/// Positions of the columns the classifier reads and writes in the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetColumns {
    pub title: usize,
    pub company: usize,
    pub relevant: usize,
}

/// Load the target table and locate its required columns.
pub fn read_target(path: &Path) -> Result<(Table, TargetColumns)> {
    ensure!(path.exists(), "file to classify does not exist: {}", path.display());
    let table = read_table(path)?;
    let cols = table.require_columns(&TARGET_COLUMNS, path)?;
    let cols = TargetColumns {
        title: cols[0],
        company: cols[1],
        relevant: cols[2],
    };
    Ok((table, cols))
}

/// Write `table` to a sibling temp file, then rename it over `path`.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    {
        let mut writer = csv::Writer::from_writer(&mut tmp);
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .with_context(|| format!("write {}", path.display()))?;
    }
    tmp.persist(path)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn quoted_fields_and_padding() {
        let dir = TempDir::new().unwrap();
        let p = write(
            &dir,
            "t.csv",
            "Title,Société,Pertinent\n\"Rachat, enfin\",ACME,\nSolde,ACME\n",
        );
        let t = read_table(&p).unwrap();
        assert_eq!(t.headers, vec!["Title", "Société", "Pertinent"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(0, 0), "Rachat, enfin");
        assert_eq!(t.rows[1], vec!["Solde", "ACME", ""]);
    }

    #[test]
    fn overlong_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let p = write(&dir, "t.csv", "Title,Société,Pertinent\na,b,c,d\ne,f,g\n");
        let t = read_table(&p).unwrap();
        assert_eq!(t.rows, vec![vec!["e", "f", "g"]]);
    }

    #[test]
    fn invalid_utf8_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("t.csv");
        fs::write(&p, b"Title,Soci\xc3\xa9t\xc3\xa9,Pertinent\na,b,c\nx\xff,y,z\nd,e,f\n").unwrap();
        let t = read_table(&p).unwrap();
        assert_eq!(t.rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn bom_is_stripped_from_header() {
        let dir = TempDir::new().unwrap();
        let p = write(&dir, "t.csv", "\u{feff}Title,Société,Pertinent\na,b,c\n");
        let t = read_table(&p).unwrap();
        assert_eq!(t.column(COL_TITLE), Some(0));
    }

    #[test]
    fn target_missing_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let p = write(&dir, "t.csv", "Title,Pertinent\na,b\n");
        let err = read_target(&p).unwrap_err().to_string();
        assert!(err.contains("Société"), "{err}");
    }

    #[test]
    fn target_columns_are_located() {
        let dir = TempDir::new().unwrap();
        let p = write(&dir, "t.csv", "Pertinent,Id,Société,Title\n,1,ACME,Fusion\n");
        let (table, cols) = read_target(&p).unwrap();
        assert_eq!(
            cols,
            TargetColumns {
                title: 3,
                company: 2,
                relevant: 0
            }
        );
        assert_eq!(table.cell(0, cols.title), "Fusion");
    }

    #[test]
    fn target_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(read_target(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn training_rows_ignore_extra_columns() {
        let dir = TempDir::new().unwrap();
        let p = write(
            &dir,
            "train.csv",
            "Id,Title,Société,Pertinent,Commentaire\n1,Fusion,ACME, Oui ,strat\n",
        );
        let rows = read_training(&p).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company, "ACME");
        assert_eq!(rows[0].relevant, " Oui ");
    }

    #[test]
    fn write_preserves_headers_and_cells() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("out.csv");
        let table = Table {
            headers: vec!["Title".into(), "Société".into(), "Pertinent".into()],
            rows: vec![vec!["Un \"titre\", long".into(), "ACME".into(), "Oui".into()]],
        };
        write_table(&p, &table).unwrap();
        assert_eq!(read_table(&p).unwrap(), table);
    }

    #[test]
    fn write_replaces_existing_file_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let p = write(&dir, "out.csv", "Title,Société,Pertinent\nold,old,old\nold2,old2,old2\n");
        let table = Table {
            headers: vec!["Title".into(), "Société".into(), "Pertinent".into()],
            rows: vec![vec!["new".into(), "ACME".into(), "Non".into()]],
        };
        write_table(&p, &table).unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "Title,Société,Pertinent\nnew,ACME,Non\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("missing").join("out.csv");
        let table = Table {
            headers: vec!["Title".into()],
            rows: vec![],
        };
        assert!(write_table(&p, &table).is_err());
        assert!(!p.exists());
    }
}

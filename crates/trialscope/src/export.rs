//! CSV export of a selection.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TrialscopeError};
use crate::table::TrialTable;

/// Serialize `table` to UTF-8 CSV bytes.
///
/// The header row follows the source column order and each record writes
/// its original cells, so two exports of the same table are byte-identical.
pub fn export_csv(table: &TrialTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.schema().headers)?;
    for record in table {
        writer.write_record(&record.cells)?;
    }

    writer
        .into_inner()
        .map_err(|e| TrialscopeError::Csv(csv::Error::from(e.into_error())))
}

/// Download file name for a filter label: `"All States"` → `all_states_trials.csv`.
pub fn export_file_name(label: &str) -> String {
    format!("{}_trials.csv", label.to_lowercase().replace(' ', "_"))
}

/// Write the export of `table` into `dir`, named after `label`.
///
/// Path separators in the label become `_`, so the file always lands
/// directly inside `dir`.
pub fn save_export(table: &TrialTable, dir: impl AsRef<Path>, label: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let path = dir.join(on_disk_name(label));
    let bytes = export_csv(table)?;

    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| TrialscopeError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(&path, &bytes).map_err(|e| TrialscopeError::Io {
        path: path.clone(),
        source: e,
    })?;

    debug!(path = %path.display(), rows = table.len(), bytes = bytes.len(), "wrote export");
    Ok(path)
}

fn on_disk_name(label: &str) -> String {
    export_file_name(label).replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Parser;

    fn table(csv: &str) -> TrialTable {
        let raw = Parser::new().parse_bytes(csv.as_bytes(), b',').unwrap();
        TrialTable::from_raw(&raw, None).unwrap()
    }

    #[test]
    fn test_export_round_trips_source_cells() {
        let t = table(
            "nct_id,category,other_language_criteria\nNCT1,CVD,\"Spanish, French\"\nNCT2,,\n",
        );
        let bytes = export_csv(&t).unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "nct_id,category,other_language_criteria\nNCT1,CVD,\"Spanish, French\"\nNCT2,,\n"
        );
    }

    #[test]
    fn test_export_is_deterministic() {
        let t = table("id,category\n1,CVD\n2,Metabolic\n");
        assert_eq!(export_csv(&t).unwrap(), export_csv(&t).unwrap());
    }

    #[test]
    fn test_export_empty_selection_has_header_only() {
        let t = table("id,category\n1,CVD\n");
        let empty = t.retain_where(|_| false);
        assert_eq!(export_csv(&empty).unwrap(), b"id,category\n");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("All Categories"), "all_categories_trials.csv");
        assert_eq!(
            export_file_name("Cardiovascular Diseases"),
            "cardiovascular_diseases_trials.csv"
        );
        assert_eq!(export_file_name("CA"), "ca_trials.csv");
    }

    #[test]
    fn test_save_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let t = table("id,category\n1,CVD\n");

        let path = save_export(&t, dir.path().join("out"), "All Categories").unwrap();
        assert!(path.ends_with("out/all_categories_trials.csv"));
        assert_eq!(fs::read(&path).unwrap(), export_csv(&t).unwrap());
    }

    #[test]
    fn test_save_export_label_with_separators() {
        let dir = tempfile::tempdir().unwrap();
        let t = table("id,category\n1,Other / Special Populations\n");

        assert_eq!(
            export_file_name("Other / Special Populations"),
            "other_/_special_populations_trials.csv"
        );
        let path = save_export(&t, dir.path(), "Other / Special Populations").unwrap();
        assert_eq!(path, dir.path().join("other___special_populations_trials.csv"));
        assert_eq!(fs::read(&path).unwrap(), export_csv(&t).unwrap());

        let path = save_export(&t, dir.path(), "A\\B").unwrap();
        assert_eq!(path, dir.path().join("a_b_trials.csv"));
    }
}

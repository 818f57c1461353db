//! Loading every record document in a directory.

use crate::record::{DocumentFormat, RecordDocument};
use crate::WireResult;
use anemia_core::PatientRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// A record document found on disk, parsed or not.
#[derive(Debug)]
pub struct LoadedRecord {
    pub path: PathBuf,
    pub record: WireResult<PatientRecord>,
}

/// Loads every `.yaml`, `.yml` and `.json` file directly inside `dir`, sorted by file name.
///
/// Files with other extensions and subdirectories are ignored. A document that fails to parse
/// is returned with its error (and logged as a warning) rather than aborting the whole load.
///
/// # Errors
///
/// Returns `WireError::Io` if the directory itself cannot be read.
pub fn load_records_dir(dir: &Path) -> WireResult<Vec<LoadedRecord>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && DocumentFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let record = RecordDocument::read_path(&path);
            if let Err(err) = &record {
                tracing::warn!("failed to parse record {}: {}", path.display(), err);
            }
            LoadedRecord { path, record }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WireError;
    use anemia_core::Group;
    use tempfile::TempDir;

    #[test]
    fn loads_sorted_documents_and_skips_other_files() {
        let temp_dir = TempDir::new().expect("create temp dir");
        fs::write(temp_dir.path().join("b.json"), r#"{"group": "pd"}"#).expect("write json");
        fs::write(temp_dir.path().join("a.yaml"), "group: hd\n").expect("write yaml");
        fs::write(temp_dir.path().join("notes.txt"), "ignore me").expect("write txt");
        fs::create_dir(temp_dir.path().join("nested.yaml")).expect("create dir");

        let loaded = load_records_dir(temp_dir.path()).expect("load dir");
        let names: Vec<_> = loaded
            .iter()
            .map(|l| l.path.file_name().and_then(|n| n.to_str()).unwrap_or(""))
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.json"]);

        let groups: Vec<_> = loaded
            .iter()
            .map(|l| l.record.as_ref().expect("parsed").group())
            .collect();
        assert_eq!(groups, vec![Some(Group::Hd), Some(Group::Pd)]);
    }

    #[test]
    fn bad_document_does_not_abort_the_load() {
        let temp_dir = TempDir::new().expect("create temp dir");
        fs::write(temp_dir.path().join("bad.yaml"), "hemoglobin: -4\n").expect("write bad");
        fs::write(temp_dir.path().join("good.yaml"), "hemoglobin: 9\n").expect("write good");

        let loaded = load_records_dir(temp_dir.path()).expect("load dir");
        assert_eq!(loaded.len(), 2);
        assert!(matches!(loaded[0].record, Err(WireError::Core(_))));
        assert!(loaded[1].record.is_ok());
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let err = load_records_dir(&temp_dir.path().join("absent")).expect_err("missing dir");
        assert!(matches!(err, WireError::Io(_)));
    }
}

//! Patient data lookup: files under a data directory whose names start with a
//! patient prefix (for example `1000_`), oldest first.

use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

/// Path fragments of cohort-level files that belong to no single patient.
pub const SUBJECTLESS_MARKERS: [&str; 3] = [
    "mean_landmarks",
    "FilteredControlBlindingLogUniqueScanFiltered",
    "weighted_perc",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Every file under `root` (or `root` itself, if it is a file) whose base name
/// starts with `prefix`. An empty prefix matches all files. With
/// `include_subjectless`, files whose path contains a subjectless marker match
/// too. Order follows the directory walk.
pub fn find_files_with_prefix(
    root: &Path,
    prefix: &str,
    include_subjectless: bool,
) -> Result<Vec<PatientFile>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }

        let named = entry.file_name().to_string_lossy().starts_with(prefix);
        let subjectless = include_subjectless && {
            let full = entry.path().to_string_lossy();
            SUBJECTLESS_MARKERS.iter().any(|m| full.contains(m))
        };
        if !(named || subjectless) {
            continue;
        }

        let modified = entry
            .metadata()
            .with_context(|| format!("Failed to stat {}", entry.path().display()))?
            .modified()
            .with_context(|| format!("Failed to read mtime of {}", entry.path().display()))?;
        found.push(PatientFile {
            path: entry.into_path(),
            modified,
        });
    }
    Ok(found)
}

/// Files of one patient under `data_dir`, sorted by modification time.
/// `None` lists every file.
pub fn find_and_sort_files_with_prefix(
    data_dir: &Path,
    prefix: Option<&str>,
) -> Result<Vec<PathBuf>> {
    if !data_dir.is_dir() {
        bail!("Data directory {} is not valid", data_dir.display());
    }

    let start = Instant::now();
    log::info!("Scanning {} for prefix {:?}", data_dir.display(), prefix);

    let mut records = find_files_with_prefix(data_dir, prefix.unwrap_or(""), false)?;
    records.sort_by_key(|r| r.modified);

    log::info!(
        "Found {} file(s) in {:.2} seconds",
        records.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(records.into_iter().map(|r| r.path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;

    fn temp_data_dir(tag: &str) -> PathBuf {
        let unique = format!(
            "vpaw_patient_{}_{}_{}",
            tag,
            std::process::id(),
            SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        std::env::temp_dir().join(unique)
    }

    /// Create `rel` under `root` with an mtime of `secs` after the epoch.
    fn touch(root: &Path, rel: &str, secs: u64) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
        path
    }

    fn populated(tag: &str) -> (PathBuf, [PathBuf; 4]) {
        let root = temp_data_dir(tag);
        let files = [
            touch(&root, "scans/1000_scan.nrrd", 3_000),
            touch(&root, "landmarks/deep/1000_landmarks.fcsv", 1_000),
            touch(&root, "scans/1001_scan.nrrd", 2_000),
            touch(&root, "cohort/mean_landmarks.p3", 500),
        ];
        (root, files)
    }

    #[test]
    fn patient_files_sorted_oldest_first() {
        let (root, files) = populated("sorted");
        let found = find_and_sort_files_with_prefix(&root, Some("1000_")).unwrap();
        assert_eq!(found, vec![files[1].clone(), files[0].clone()]);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn no_prefix_lists_everything() {
        let (root, files) = populated("all");
        let found = find_and_sort_files_with_prefix(&root, None).unwrap();
        assert_eq!(
            found,
            vec![
                files[3].clone(),
                files[1].clone(),
                files[2].clone(),
                files[0].clone()
            ]
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn subjectless_files_join_on_request() {
        let (root, files) = populated("subjectless");
        let mut without: Vec<_> = find_files_with_prefix(&root, "1001_", false)
            .unwrap()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(without, vec![files[2].clone()]);

        without = find_files_with_prefix(&root, "1001_", true)
            .unwrap()
            .into_iter()
            .map(|r| r.path)
            .collect();
        without.sort();
        let mut expected = vec![files[2].clone(), files[3].clone()];
        expected.sort();
        assert_eq!(without, expected);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn single_file_root_is_matched_by_name() {
        let (root, files) = populated("file_root");
        let hit = find_files_with_prefix(&files[0], "1000_", false).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].modified, SystemTime::UNIX_EPOCH + Duration::from_secs(3_000));
        assert!(find_files_with_prefix(&files[0], "1001_", false).unwrap().is_empty());
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_data_directory_is_an_error() {
        let root = temp_data_dir("missing");
        assert!(find_and_sort_files_with_prefix(&root, Some("1000_")).is_err());
    }
}

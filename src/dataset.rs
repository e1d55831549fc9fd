use anyhow::{Context, Result};
use log::info;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the derived dataset holding `size` data rows.
pub fn dataset_file_name(size: usize) -> String {
    format!("students_{size}.csv")
}

/// Returns the path of the `size`-row dataset in `dir`, deriving it from
/// `master` (header plus the first `size` data rows) when it does not exist
/// yet. An existing file is reused as is.
pub fn ensure_dataset(master: &Path, dir: &Path, size: usize) -> Result<PathBuf> {
    let path = dir.join(dataset_file_name(size));
    if path.exists() {
        return Ok(path);
    }
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let src = File::open(master)
        .with_context(|| format!("failed to open master dataset {}", master.display()))?;
    let partial = path.with_extension("csv.partial");
    let written = match copy_head(src, master, &partial, size) {
        Ok(written) => written,
        Err(err) => {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }
    };
    fs::rename(&partial, &path)
        .with_context(|| format!("failed to move dataset into {}", path.display()))?;
    info!(
        "derived {} with {} data rows from {}",
        path.display(),
        written.saturating_sub(1),
        master.display()
    );
    Ok(path)
}

/// Copies the header and the first `size` data rows of `src` into `dst`.
/// Returns the number of lines written.
fn copy_head(src: File, master: &Path, dst: &Path, size: usize) -> Result<usize> {
    let file =
        File::create(dst).with_context(|| format!("failed to create dataset {}", dst.display()))?;
    let mut out = BufWriter::new(file);
    let mut written = 0usize;
    for line in BufReader::new(src).lines().take(size.saturating_add(1)) {
        let line = line.with_context(|| format!("failed to read {}", master.display()))?;
        writeln!(out, "{line}")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "h1,h2\nr1\nr2\nr3\nr4\nr5\n";

    #[test]
    fn truncates_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let master = dir.path().join("students.csv");
        fs::write(&master, MASTER).unwrap();

        let path = ensure_dataset(&master, dir.path(), 3).unwrap();
        assert_eq!(path.file_name().unwrap(), "students_3.csv");
        assert_eq!(fs::read_to_string(&path).unwrap(), "h1,h2\nr1\nr2\nr3\n");

        // cached copy wins over a changed master
        fs::write(&master, "other\n").unwrap();
        let again = ensure_dataset(&master, dir.path(), 3).unwrap();
        assert_eq!(again, path);
        assert_eq!(fs::read_to_string(&again).unwrap(), "h1,h2\nr1\nr2\nr3\n");
    }

    #[test]
    fn short_master_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let master = dir.path().join("students.csv");
        fs::write(&master, MASTER).unwrap();
        let path = ensure_dataset(&master, &dir.path().join("data"), 100).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), MASTER);
    }

    #[test]
    fn failed_read_leaves_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let master = dir.path().join("students.csv");
        fs::write(&master, b"h\nr1\nr2\n\xff\xfe\nr4\n").unwrap();

        let err = ensure_dataset(&master, dir.path(), 4).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"), "{err:#}");
        let left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(left, ["students.csv"]);

        fs::write(&master, "h\nr1\nr2\nr3\nr4\n").unwrap();
        let path = ensure_dataset(&master, dir.path(), 4).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "h\nr1\nr2\nr3\nr4\n");
    }

    #[test]
    fn huge_size_copies_whole_master() {
        let dir = tempfile::tempdir().unwrap();
        let master = dir.path().join("students.csv");
        fs::write(&master, MASTER).unwrap();
        let path = ensure_dataset(&master, dir.path(), usize::MAX).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), MASTER);
    }

    #[test]
    fn missing_master_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ensure_dataset(&dir.path().join("nope.csv"), dir.path(), 10).unwrap_err();
        assert!(format!("{err:#}").contains("master dataset"), "{err:#}");
        assert!(!dir.path().join(dataset_file_name(10)).exists());
    }
}

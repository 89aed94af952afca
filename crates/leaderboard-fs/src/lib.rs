//! Atomic file replacement for the converter's output artifacts.
//!
//! Every output is produced the same way:
//! - write into a temp file created next to the destination (same filesystem, so the final
//!   rename never crosses devices)
//! - flush + `sync_all`
//! - rename over the destination, replacing whatever was there
//!
//! The temp file is owned by a [`NamedTempFile`] guard, so its handle is closed and the file is
//! removed on every early-return path.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError<E> {
    #[error("failed to write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Writer(E),
}

impl<E> PersistError<E> {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Directory the temp file is created in.
///
/// Outputs default to bare names in the working directory, whose parent is empty.
fn parent_dir_or_dot(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Replace `dest` with whatever `write_fn` writes into a buffered handle.
///
/// Parent directories are created as needed. If `write_fn` fails, the destination is left
/// exactly as it was.
pub fn replace_with<T, E>(
    dest: impl AsRef<Path>,
    write_fn: impl FnOnce(&mut BufWriter<&mut File>) -> Result<T, E>,
) -> Result<T, PersistError<E>> {
    let dest = dest.as_ref();
    let dir = parent_dir_or_dot(dest);
    fs::create_dir_all(dir).map_err(|err| PersistError::io(dir, err))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| PersistError::io(dest, err))?;
    let out = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let out = write_fn(&mut writer).map_err(PersistError::Writer)?;
        writer.flush().map_err(|err| PersistError::io(dest, err))?;
        out
    };
    tmp.as_file()
        .sync_all()
        .map_err(|err| PersistError::io(dest, err))?;

    tmp.persist(dest)
        .map_err(|err| PersistError::io(dest, err.error))?;

    // Directory fsync is best-effort; the file is already in place.
    let _ = File::open(dir).and_then(|d| d.sync_all());

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replace_bytes(dest: &Path, bytes: &[u8]) -> Result<(), PersistError<io::Error>> {
        replace_with(dest, |w| w.write_all(bytes))
    }

    fn files_in(dir: &Path) -> Vec<PathBuf> {
        let mut names: Vec<PathBuf> = fs::read_dir(dir)
            .expect("read_dir")
            .map(|e| e.expect("dir entry").path())
            .filter(|p| p.is_file())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn bare_names_resolve_to_working_directory() {
        assert_eq!(parent_dir_or_dot(Path::new("performance.json")), Path::new("."));
        assert_eq!(
            parent_dir_or_dot(Path::new("public/build-meta.json")),
            Path::new("public")
        );
        assert_eq!(parent_dir_or_dot(Path::new("/model.json")), Path::new("/"));
    }

    #[test]
    fn overwrites_existing_destination() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dest = tmp.path().join("model.json");
        fs::write(&dest, b"old contents that are longer than the new ones").expect("seed");

        replace_bytes(&dest, b"new").expect("replace");
        assert_eq!(fs::read(&dest).expect("read"), b"new");
        assert_eq!(files_in(tmp.path()), vec![dest]);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dest = tmp.path().join("out").join("nested").join("model.json");

        replace_bytes(&dest, b"{}").expect("replace");
        assert_eq!(fs::read(&dest).expect("read"), b"{}");
    }

    #[test]
    fn writer_error_leaves_destination_untouched() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dest = tmp.path().join("performance.json");
        fs::write(&dest, b"sentinel").expect("seed");

        let err = replace_with(&dest, |w| {
            w.write_all(b"partial").expect("buffered write");
            Err::<(), _>(io::Error::new(io::ErrorKind::Other, "simulated failure"))
        })
        .expect_err("writer error should propagate");
        assert!(matches!(err, PersistError::Writer(_)), "{err}");

        assert_eq!(fs::read(&dest).expect("read"), b"sentinel");
        assert_eq!(
            files_in(tmp.path()),
            vec![dest],
            "temp file should be cleaned up"
        );
    }
}

//! On-disk copies of uploads and their artifacts.

use solar_analysis::{AnalysisOutput, Artifact};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Write the four artifact PNGs into `dir`, creating it if needed.
///
/// Returns the written paths in [`Artifact::ALL`] order.
pub fn write_artifacts(dir: &Path, output: &AnalysisOutput) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    Artifact::ALL
        .iter()
        .map(|&artifact| {
            let path = dir.join(artifact.file_name());
            fs::write(&path, output.artifact(artifact))?;
            Ok(path)
        })
        .collect()
}

/// Subdirectory of an analysis directory holding the original upload
pub const INPUT_DIR: &str = "input";

/// Keep an upload and its artifacts under `<save_dir>/<id>/`.
///
/// The upload goes to `input/<filename>` so that no upload name can collide
/// with an artifact. `filename` must already be sanitized. Returns the
/// analysis directory.
pub fn archive_upload(
    save_dir: &Path,
    id: Uuid,
    filename: &str,
    upload: &[u8],
    output: &AnalysisOutput,
) -> io::Result<PathBuf> {
    let dir = save_dir.join(id.to_string());
    let input_dir = dir.join(INPUT_DIR);
    fs::create_dir_all(&input_dir)?;
    fs::write(input_dir.join(filename), upload)?;
    write_artifacts(&dir, output)?;
    tracing::debug!(dir = %dir.display(), "Archived upload and artifacts");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_analysis::Metrics;

    fn output() -> AnalysisOutput {
        AnalysisOutput {
            metrics: Metrics::ZERO,
            original: b"o".to_vec(),
            segmented: b"s".to_vec(),
            shadow_overlay: b"h".to_vec(),
            edges: b"e".to_vec(),
        }
    }

    #[test]
    fn test_write_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let paths = write_artifacts(&target, &output()).unwrap();

        assert_eq!(paths.len(), 4);
        assert_eq!(fs::read(target.join("original.png")).unwrap(), b"o");
        assert_eq!(fs::read(target.join("segmented.png")).unwrap(), b"s");
        assert_eq!(fs::read(target.join("shadow.png")).unwrap(), b"h");
        assert_eq!(fs::read(target.join("edges.png")).unwrap(), b"e");
    }

    #[test]
    fn test_archive_upload_layout() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();
        let archived = archive_upload(dir.path(), id, "roof.png", b"raw", &output()).unwrap();

        assert_eq!(archived, dir.path().join(id.to_string()));
        assert_eq!(
            fs::read(archived.join(INPUT_DIR).join("roof.png")).unwrap(),
            b"raw"
        );
        assert!(archived.join("edges.png").exists());
    }

    #[test]
    fn test_upload_named_like_artifact_survives() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();
        let archived =
            archive_upload(dir.path(), id, "edges.png", b"UPLOAD-BYTES", &output()).unwrap();

        assert_eq!(
            fs::read(archived.join(INPUT_DIR).join("edges.png")).unwrap(),
            b"UPLOAD-BYTES"
        );
        assert_eq!(fs::read(archived.join("edges.png")).unwrap(), b"e");
    }
}

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::{ProjectDirs, UserDirs};
use rfd::FileDialog;

use crate::usecase::ports::download::{Download, DownloadSink};
use crate::usecase::services::import_service::{Upload, UploadKind};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "farmacia", "price-base")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}

/// Where the save dialog opens when no `export_dir` is configured.
pub fn default_export_dir() -> Option<PathBuf> {
    UserDirs::new().and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
}

/// Asks for a file and reads it whole. `Ok(None)` when the dialog is closed.
pub fn pick_upload(kind: UploadKind) -> Result<Option<Upload>> {
    let title = match kind {
        UploadKind::Catalog => "Cargar catálogo",
        UploadKind::Base => "Cargar base",
    };
    let Some(path) = FileDialog::new()
        .set_title(title)
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("Todos los archivos", &["*"])
        .pick_file()
    else {
        return Ok(None);
    };

    read_upload(&path).map(Some)
}

pub fn read_upload(path: &Path) -> Result<Upload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    tracing::debug!(file = %file_name, bytes = bytes.len(), "upload read");
    Ok(Upload::new(file_name, bytes))
}

/// Hands downloads to a native save dialog.
pub struct SaveDialogSink {
    start_dir: Option<PathBuf>,
}

impl SaveDialogSink {
    pub fn new(export_dir: Option<PathBuf>) -> Self {
        Self {
            start_dir: export_dir.or_else(default_export_dir),
        }
    }
}

impl DownloadSink for SaveDialogSink {
    fn deliver(&self, download: &Download) -> Result<Option<PathBuf>> {
        let extension = Path::new(&download.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let mut dialog = FileDialog::new()
            .set_title("Guardar base")
            .set_file_name(&download.file_name)
            .add_filter(extension.to_ascii_uppercase(), &[extension]);
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            return Ok(None);
        };
        write_download(&path, download)?;
        Ok(Some(path))
    }
}

pub fn write_download(path: &Path, download: &Download) -> Result<()> {
    std::fs::write(path, &download.bytes)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("price-base-{name}-{nanos}"));
        std::fs::create_dir_all(&dir).expect("should create scratch dir");
        dir
    }

    #[test]
    fn ensure_webview_data_dir_creates_subdirectory() {
        let base = scratch_dir("webview");

        let dir = ensure_webview_data_dir(&base).expect("should create webview dir");

        assert_eq!(dir, base.join("webview2"));
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&base).expect("should clean up");
    }

    #[test]
    fn written_download_reads_back_as_upload() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("base_2026-10.csv");
        let download = Download {
            file_name: "base_2026-10.csv".to_string(),
            mime_type: "text/csv",
            bytes: b"CodEstab,CodProd\n".to_vec(),
        };

        write_download(&path, &download).expect("should write download");
        let upload = read_upload(&path).expect("should read upload");

        assert_eq!(upload.file_name, "base_2026-10.csv");
        assert_eq!(upload.bytes, download.bytes);
        std::fs::remove_dir_all(&dir).expect("should clean up");
    }

    #[test]
    fn reading_missing_file_names_the_path() {
        let err = read_upload(Path::new("/nonexistent/catalogo.xlsx"))
            .expect_err("missing file should fail");
        assert!(err.to_string().contains("catalogo.xlsx"));
    }
}

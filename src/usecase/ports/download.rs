use std::path::PathBuf;

/// An exported file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Where downloads end up: a save dialog on desktop, a buffer in tests.
pub trait DownloadSink {
    /// Returns the saved location, or `None` when the user backed out.
    fn deliver(&self, download: &Download) -> anyhow::Result<Option<PathBuf>>;
}

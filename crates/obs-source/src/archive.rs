//! Archive download and extraction into a temporary workspace.

use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use ureq::Agent;
use zip::ZipArchive;

use crate::error::SourceError;

/// Git forge hosting the translation repositories.
pub const DOOR43_SITE_URL: &str = "https://git.door43.org";

/// Archive downloads can be slow on small hosts.
const DOWNLOAD_TIMEOUT: u64 = 120;

/// Zip download URL for a repository at a branch, tag or commit.
#[must_use]
pub fn repo_archive_url(user: &str, repo: &str, reference: &str) -> String {
    format!("{DOOR43_SITE_URL}/{user}/{repo}/archive/{reference}.zip")
}

/// HTTP agent configured for source downloads.
#[must_use]
pub fn http_agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(DOWNLOAD_TIMEOUT)))
        .build()
        .into()
}

/// Extracted source archive.
///
/// The backing temporary directory lives as long as this value, so
/// callers keep it around while reading the content.
pub struct SourceWorkspace {
    root: TempDir,
    source_dir: std::path::PathBuf,
}

impl SourceWorkspace {
    /// Download `zip_url` and extract it.
    ///
    /// Resource archives contain a single top-level directory, named
    /// after the repository or `<lang>_obs` for catalog sources;
    /// `source_dir_name` says which one to expect.
    pub fn fetch(
        agent: &Agent,
        zip_url: &str,
        source_dir_name: &str,
    ) -> Result<Self, SourceError> {
        tracing::info!(zip_url, "downloading source archive");
        let data = agent.get(zip_url).call()?.into_body().read_to_vec()?;

        let root = tempfile::Builder::new().prefix("obs-to-pdf-").tempdir()?;
        extract_zip(Cursor::new(data), root.path())?;

        let source_dir = root.path().join(source_dir_name);
        if !source_dir.is_dir() {
            return Err(SourceError::Missing(format!(
                "the {source_dir_name} directory"
            )));
        }
        Ok(Self { root, source_dir })
    }

    /// Directory holding `manifest.yaml` and `content/`.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Workspace root, usable for per-run scratch output.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        self.root.path()
    }
}

fn extract_zip<R: Read + Seek>(reader: R, dest: &Path) -> Result<(), SourceError> {
    let mut archive = ZipArchive::new(reader)?;
    archive.extract(dest)?;
    Ok(())
}

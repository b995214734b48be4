//! What to build a PDF from.

use obs_source::{SourceError, repo_archive_url};

/// Default branch used when a plain repository is requested.
const DEFAULT_BRANCH: &str = "master";

/// Folder inside the CDN bucket for catalog and plain-repo builds.
const AUTO_PDF_FOLDER: &str = "obs/auto_PDFs";

/// One PDF generation request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PdfRequest {
    /// A language code resolved through the Door43 catalog.
    LangCode(String),
    /// A `user/repo` on git.door43.org, default branch.
    Repo { user: String, repo: String },
    /// A `user/repo` at a specific branch or tag.
    RepoRef {
        user: String,
        repo: String,
        reference: String,
    },
}

impl PdfRequest {
    /// Parse a `user/repo` spec.
    pub fn from_repo_spec(spec: &str) -> Result<Self, SourceError> {
        let trimmed = spec.trim_matches('/');
        match trimmed.split('/').collect::<Vec<_>>().as_slice() {
            [user, repo] if !user.is_empty() && !repo.is_empty() => Ok(Self::Repo {
                user: (*user).to_owned(),
                repo: (*repo).to_owned(),
            }),
            _ => Err(SourceError::InvalidRepoSpec(spec.to_owned())),
        }
    }

    /// Human-readable provenance, recorded on the book and printed in
    /// the license part of the PDF.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::LangCode(code) => format!("D43 Catalog {code}"),
            Self::Repo { user, repo } => format!("{user}/{repo}"),
            Self::RepoRef {
                user,
                repo,
                reference,
            } => format!("{user}/{repo}--{reference}"),
        }
    }

    /// Stem of the uploaded PDF filename.
    #[must_use]
    pub fn filename_bit(&self) -> String {
        match self {
            Self::LangCode(code) => code.clone(),
            Self::Repo { user, repo } => format!("{user}--{repo}"),
            Self::RepoRef {
                user,
                repo,
                reference,
            } => format!("{user}--{repo}--{reference}"),
        }
    }

    /// Folder inside the CDN bucket.
    #[must_use]
    pub fn cdn_folder(&self) -> String {
        match self {
            Self::LangCode(_) | Self::Repo { .. } => AUTO_PDF_FOLDER.to_owned(),
            Self::RepoRef {
                user,
                repo,
                reference,
            } => format!("u/{user}/{repo}/{reference}"),
        }
    }

    /// Top-level directory expected inside the extracted archive.
    #[must_use]
    pub fn source_dir_name(&self) -> String {
        match self {
            Self::LangCode(code) => format!("{}_obs", code.to_lowercase()),
            Self::Repo { repo, .. } | Self::RepoRef { repo, .. } => repo.clone(),
        }
    }

    /// Archive URL for repository requests; catalog requests resolve
    /// theirs through the catalog instead.
    #[must_use]
    pub fn archive_url(&self) -> Option<String> {
        match self {
            Self::LangCode(_) => None,
            Self::Repo { user, repo } => Some(repo_archive_url(user, repo, DEFAULT_BRANCH)),
            Self::RepoRef {
                user,
                repo,
                reference,
            } => Some(repo_archive_url(user, repo, reference)),
        }
    }
}

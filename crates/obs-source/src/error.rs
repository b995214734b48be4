//! Error types for source acquisition.

/// Error while locating, downloading or loading a book source.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SourceError {
    /// Language code absent from the catalog.
    #[error("did not find \"{0}\" in the catalog")]
    LanguageNotFound(String),

    /// Language code listed more than once in the catalog.
    #[error("found more than one entry for \"{0}\" in the catalog")]
    LanguageAmbiguous(String),

    /// No OBS resource under the language entry.
    #[error("did not find an entry for \"{0}\" OBS in the catalog")]
    ResourceNotFound(String),

    /// More than one OBS resource under the language entry.
    #[error("found more than one entry for \"{0}\" OBS in the catalog")]
    ResourceAmbiguous(String),

    /// No zipped markdown format among the resource projects.
    #[error("did not find any zipped markdown entries for \"{0}\" OBS in the catalog")]
    FormatNotFound(String),

    /// More than one zipped markdown format.
    #[error("found more than one zipped markdown entry for \"{0}\" OBS in the catalog")]
    FormatAmbiguous(String),

    /// Repository parameter was not of the form `user/repo`.
    #[error("invalid repository spec \"{0}\", expected user/repo")]
    InvalidRepoSpec(String),

    /// A required file or directory is absent from the container.
    #[error("did not find {0} in the resource container")]
    Missing(String),

    /// HTTP request failed (network error, timeout, bad status).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// Archive could not be read or extracted.
    #[error("archive error")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// manifest.yaml could not be deserialized.
    #[error("manifest error")]
    Manifest(#[from] serde_yaml::Error),

    /// A chapter file did not parse.
    #[error("chapter parse error")]
    Parse(#[from] obs_model::ParseError),
}

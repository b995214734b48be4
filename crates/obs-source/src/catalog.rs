//! Door43 catalog lookup.
//!
//! The catalog is one large JSON document listing every language, its
//! resources and the downloadable formats for each. A book source is
//! located by language code: exactly one language entry, exactly one
//! `obs` resource, exactly one zipped-markdown format. Any miss or
//! ambiguity is its own error so the caller can report precisely what
//! went wrong.

use serde::Deserialize;
use ureq::Agent;

use crate::error::SourceError;

pub const CATALOG_URL: &str = "https://api.door43.org/v3/catalog.json";

#[derive(Debug, Deserialize)]
pub struct Catalog {
    pub languages: Vec<CatalogLanguage>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogLanguage {
    pub identifier: String,
    #[serde(default)]
    pub resources: Vec<CatalogResource>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogResource {
    pub identifier: String,
    #[serde(default)]
    pub projects: Vec<CatalogProject>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogProject {
    #[serde(default)]
    pub formats: Option<Vec<CatalogFormat>>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogFormat {
    pub format: String,
    pub url: String,
}

/// Download and decode the catalog.
pub fn fetch_catalog(agent: &Agent) -> Result<Catalog, SourceError> {
    tracing::info!(url = CATALOG_URL, "downloading the Door43 catalog");
    let catalog = agent
        .get(CATALOG_URL)
        .call()?
        .into_body()
        .read_json::<Catalog>()?;
    Ok(catalog)
}

/// Find the unique zipped-markdown source URL for a language.
pub fn find_zip_url(catalog: &Catalog, lang_code: &str) -> Result<String, SourceError> {
    let languages: Vec<&CatalogLanguage> = catalog
        .languages
        .iter()
        .filter(|language| language.identifier == lang_code)
        .collect();
    let language = match languages.as_slice() {
        [] => return Err(SourceError::LanguageNotFound(lang_code.to_owned())),
        [language] => language,
        _ => return Err(SourceError::LanguageAmbiguous(lang_code.to_owned())),
    };

    let resources: Vec<&CatalogResource> = language
        .resources
        .iter()
        .filter(|resource| resource.identifier == "obs")
        .collect();
    let resource = match resources.as_slice() {
        [] => return Err(SourceError::ResourceNotFound(lang_code.to_owned())),
        [resource] => resource,
        _ => return Err(SourceError::ResourceAmbiguous(lang_code.to_owned())),
    };

    let mut found: Vec<&str> = Vec::new();
    for project in &resource.projects {
        let Some(formats) = &project.formats else {
            continue;
        };
        let urls: Vec<&str> = formats
            .iter()
            .filter(|format| {
                format.format.contains("application/zip")
                    && format.format.contains("text/markdown")
            })
            .map(|format| format.url.as_str())
            .collect();
        if urls.len() > 1 {
            return Err(SourceError::FormatAmbiguous(lang_code.to_owned()));
        }
        found.extend(urls);
    }

    match found.as_slice() {
        [] => Err(SourceError::FormatNotFound(lang_code.to_owned())),
        [url] => Ok((*url).to_owned()),
        _ => Err(SourceError::FormatAmbiguous(lang_code.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn catalog(json: &str) -> Catalog {
        serde_json::from_str(json).unwrap()
    }

    const ONE_SOURCE: &str = r#"{
        "languages": [
            {
                "identifier": "en",
                "resources": [
                    {
                        "identifier": "obs",
                        "projects": [
                            {
                                "formats": [
                                    {
                                        "format": "application/zip; type=book content=text/markdown",
                                        "url": "https://cdn.door43.org/en/obs/v4/obs.zip"
                                    },
                                    {
                                        "format": "application/pdf",
                                        "url": "https://cdn.door43.org/en/obs/v4/obs.pdf"
                                    }
                                ]
                            }
                        ]
                    },
                    { "identifier": "tn", "projects": [] }
                ]
            }
        ]
    }"#;

    #[test]
    fn finds_the_unique_zipped_markdown_url() {
        let url = find_zip_url(&catalog(ONE_SOURCE), "en").unwrap();
        assert_eq!(url, "https://cdn.door43.org/en/obs/v4/obs.zip");
    }

    #[test]
    fn missing_language_is_reported() {
        let err = find_zip_url(&catalog(ONE_SOURCE), "xx").unwrap_err();
        assert_eq!(err.to_string(), "did not find \"xx\" in the catalog");
    }

    #[test]
    fn duplicate_language_entries_are_ambiguous() {
        let json = r#"{"languages": [
            {"identifier": "en", "resources": []},
            {"identifier": "en", "resources": []}
        ]}"#;
        let err = find_zip_url(&catalog(json), "en").unwrap_err();
        assert!(matches!(err, SourceError::LanguageAmbiguous(_)));
    }

    #[test]
    fn language_without_obs_resource_is_reported() {
        let json = r#"{"languages": [
            {"identifier": "fr", "resources": [{"identifier": "tn", "projects": []}]}
        ]}"#;
        let err = find_zip_url(&catalog(json), "fr").unwrap_err();
        assert_eq!(
            err.to_string(),
            "did not find an entry for \"fr\" OBS in the catalog"
        );
    }

    #[test]
    fn null_formats_are_skipped() {
        let json = r#"{"languages": [
            {"identifier": "fr", "resources": [
                {"identifier": "obs", "projects": [{"formats": null}]}
            ]}
        ]}"#;
        let err = find_zip_url(&catalog(json), "fr").unwrap_err();
        assert!(matches!(err, SourceError::FormatNotFound(_)));
    }

    #[test]
    fn two_zipped_markdown_formats_are_ambiguous() {
        let json = r#"{"languages": [
            {"identifier": "fr", "resources": [
                {"identifier": "obs", "projects": [
                    {"formats": [
                        {"format": "application/zip; content=text/markdown", "url": "https://a"},
                        {"format": "application/zip; content=text/markdown", "url": "https://b"}
                    ]}
                ]}
            ]}
        ]}"#;
        let err = find_zip_url(&catalog(json), "fr").unwrap_err();
        assert!(matches!(err, SourceError::FormatAmbiguous(_)));
    }
}

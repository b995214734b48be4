//! Resource container manifest (`manifest.yaml`).

use std::path::Path;

use serde::{Deserialize, Deserializer};

use obs_model::Direction;

use crate::error::SourceError;

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub dublin_core: DublinCore,
    #[serde(default)]
    pub checking: Checking,
}

#[derive(Debug, Deserialize)]
pub struct DublinCore {
    pub language: ManifestLanguage,
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    pub publisher: String,
}

#[derive(Debug, Deserialize)]
pub struct ManifestLanguage {
    pub identifier: String,
    pub title: String,
    pub direction: Direction,
}

#[derive(Debug, Default, Deserialize)]
pub struct Checking {
    #[serde(default, deserialize_with = "string_or_number")]
    pub checking_level: String,
}

impl Manifest {
    /// Load and decode a manifest file, tolerating a UTF-8 BOM.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(text.trim_start_matches('\u{feff}'))?)
    }
}

/// Version and checking level are written as bare numbers in some
/// manifests and as strings in others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(serde_yaml::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::String(value) => value,
        Raw::Number(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const MANIFEST: &str = "\
dublin_core:
  language:
    identifier: fr
    title: français
    direction: ltr
  version: 4
  publisher: Door43
checking:
  checking_level: '3'
";

    #[test]
    fn decodes_numbers_and_strings_alike() {
        let manifest: Manifest = serde_yaml::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.dublin_core.version, "4");
        assert_eq!(manifest.checking.checking_level, "3");
        assert_eq!(manifest.dublin_core.language.identifier, "fr");
        assert_eq!(manifest.dublin_core.language.direction, Direction::Ltr);
    }

    #[test]
    fn checking_section_is_optional() {
        let manifest: Manifest = serde_yaml::from_str(
            "dublin_core:\n  language: {identifier: en, title: English, direction: ltr}\n  version: '4'\n  publisher: unfoldingWord\n",
        )
        .unwrap();
        assert_eq!(manifest.checking.checking_level, "");
    }

    #[test]
    fn bom_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yaml");
        std::fs::write(&path, format!("\u{feff}{MANIFEST}")).unwrap();
        let manifest = Manifest::from_file(&path).unwrap();
        assert_eq!(manifest.dublin_core.publisher, "Door43");
    }
}

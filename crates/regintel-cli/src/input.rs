//! Reading JSON and YAML input documents.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Document encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json` or anything unrecognised.
    Json,
    /// `.yaml` or `.yml`.
    Yaml,
}

impl Format {
    /// Pick the format for `path`.
    pub fn of(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Read and deserialize a document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = match Format::of(path) {
        Format::Yaml => serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse YAML: {}", path.display()))?,
        Format::Json => serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))?,
    };
    tracing::debug!(path = %path.display(), "read input document");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn format_by_extension() {
        assert_eq!(Format::of(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::of(Path::new("a.YML")), Format::Yaml);
        assert_eq!(Format::of(Path::new("a.json")), Format::Json);
        assert_eq!(Format::of(Path::new("a")), Format::Json);
    }

    #[test]
    fn reads_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("doc.json");
        let yaml = dir.path().join("doc.yml");
        std::fs::write(&json, r#"{"name":"x","count":2}"#).unwrap();
        std::fs::write(&yaml, "name: x\ncount: 2\n").unwrap();

        let expected = Doc {
            name: "x".into(),
            count: 2,
        };
        assert_eq!(read_document::<Doc>(&json).unwrap(), expected);
        assert_eq!(read_document::<Doc>(&yaml).unwrap(), expected);
    }

    #[test]
    fn malformed_document_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_document::<Doc>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}

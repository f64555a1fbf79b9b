use crate::{errors::PromptSourceError, types::PromptDocument};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

const FRAGMENT_SEPARATOR: &str = "\n\n";
const FRAGMENT_EXTENSION: &str = "txt";

/// Where the system prompt fragments are read from.
///
/// `fragments` lists fragment ids in the order they are concatenated. For a
/// directory, id `x` resolves to `<path>/x.txt`; for a document, it is a key of
/// the top-level YAML mapping. An empty list falls back to sorted file names or
/// the document's own key order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum PromptSource {
    Directory {
        path: PathBuf,
        #[serde(default)]
        fragments: Vec<String>,
    },
    Document {
        path: PathBuf,
        #[serde(default)]
        fragments: Vec<String>,
    },
}

impl PromptSource {
    pub fn path(&self) -> &Path {
        match self {
            PromptSource::Directory { path, .. } | PromptSource::Document { path, .. } => path,
        }
    }
}

/// Reads all fragments from `source` and joins them with a blank line.
///
/// Called once at startup. Any error here means the service is not fit to
/// serve requests.
pub fn assemble_system_prompt(source: &PromptSource) -> Result<PromptDocument, PromptSourceError> {
    let fragments = match source {
        PromptSource::Directory { path, fragments } => read_directory(path, fragments)?,
        PromptSource::Document { path, fragments } => read_document(path, fragments)?,
    };

    if fragments.is_empty() {
        return Err(PromptSourceError::Empty(source.path().to_path_buf()));
    }

    let text = fragments.join(FRAGMENT_SEPARATOR);
    info!(
        path = %source.path().display(),
        fragments = fragments.len(),
        chars = text.chars().count(),
        "Assembled system prompt."
    );
    Ok(PromptDocument::new(text, fragments.len()))
}

fn read_fragment_file(path: &Path) -> Result<String, PromptSourceError> {
    fs::read_to_string(path).map_err(|source| PromptSourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_directory(dir: &Path, ids: &[String]) -> Result<Vec<String>, PromptSourceError> {
    if !dir.is_dir() {
        return Err(PromptSourceError::NotFound(dir.to_path_buf()));
    }

    if !ids.is_empty() {
        return ids
            .iter()
            .map(|id| {
                let file = dir.join(format!("{id}.{FRAGMENT_EXTENSION}"));
                if !file.is_file() {
                    return Err(PromptSourceError::MissingFragment {
                        id: id.clone(),
                        path: dir.to_path_buf(),
                    });
                }
                read_fragment_file(&file)
            })
            .collect();
    }

    warn!(
        path = %dir.display(),
        "No fragment order configured, falling back to sorted file names."
    );
    let entries = fs::read_dir(dir).map_err(|source| PromptSourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| PromptSourceError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == FRAGMENT_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();

    files.iter().map(|file| read_fragment_file(file)).collect()
}

fn read_document(path: &Path, ids: &[String]) -> Result<Vec<String>, PromptSourceError> {
    if !path.is_file() {
        return Err(PromptSourceError::NotFound(path.to_path_buf()));
    }

    let content = read_fragment_file(path)?;
    if content.trim().is_empty() {
        return Err(PromptSourceError::Empty(path.to_path_buf()));
    }

    let invalid = |message: String| PromptSourceError::Document {
        path: path.to_path_buf(),
        message,
    };

    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;

    // The mapping keeps the document's key order.
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in &mapping {
        let key = key
            .as_str()
            .ok_or_else(|| invalid(format!("fragment key {key:?} is not a string")))?;
        let value = value
            .as_str()
            .ok_or_else(|| invalid(format!("fragment '{key}' is not a string")))?;
        entries.push((key.to_string(), value.to_string()));
    }

    if ids.is_empty() {
        warn!(
            path = %path.display(),
            "No fragment order configured, using document key order."
        );
        return Ok(entries.into_iter().map(|(_, text)| text).collect());
    }

    ids.iter()
        .map(|id| {
            entries
                .iter()
                .find(|(key, _)| key == id)
                .map(|(_, text)| text.clone())
                .ok_or_else(|| PromptSourceError::MissingFragment {
                    id: id.clone(),
                    path: path.to_path_buf(),
                })
        })
        .collect()
}

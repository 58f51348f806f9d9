//! Settings threaded into every request.
//!
//! Values are read once, up front, and passed down explicitly. Nothing
//! below this module looks at files or the environment for configuration.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::PropscopeError;
use crate::oracle::LibraryLayout;

/// Language of the documentation shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DocLanguage {
    En,
    #[default]
    Zh,
}

impl DocLanguage {
    /// `"English"` selects English; any other label, or none, Chinese.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("English") => Self::En,
            _ => Self::Zh,
        }
    }
}

/// Major version of the component library in a workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum LibraryVersion {
    #[default]
    #[serde(rename = "v3")]
    V3,
    #[serde(rename = "v4")]
    V4,
}

impl LibraryVersion {
    /// `"^4"` selects version 4; any other label, or none, version 3.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("^4") => Self::V4,
            _ => Self::V3,
        }
    }
}

/// Raw settings file, as the editor's settings UI writes it.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SettingsFile {
    language: Option<String>,
    library_version: Option<String>,
    handler_prefix: Option<String>,
    tab_size: Option<usize>,
    insert_spaces: Option<bool>,
    layout: Option<LibraryLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub language: DocLanguage,
    pub library_version: LibraryVersion,
    /// Prepended to the capitalized attribute name: `handle` + `OnChange`.
    pub handler_prefix: String,
    pub tab_size: usize,
    pub insert_spaces: bool,
    pub layout: LibraryLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DocLanguage::default(),
            library_version: LibraryVersion::default(),
            handler_prefix: "handle".to_string(),
            tab_size: 4,
            insert_spaces: true,
            layout: LibraryLayout::default(),
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, PropscopeError> {
        let raw: SettingsFile = serde_json::from_str(text)
            .map_err(|e| PropscopeError::Config(format!("settings: {e}")))?;
        let defaults = Self::default();
        let tab_size = raw.tab_size.unwrap_or(defaults.tab_size);
        if tab_size == 0 {
            return Err(PropscopeError::Config("tabSize must be positive".to_string()));
        }
        Ok(Self {
            language: DocLanguage::from_label(raw.language.as_deref()),
            library_version: LibraryVersion::from_label(raw.library_version.as_deref()),
            handler_prefix: raw.handler_prefix.unwrap_or(defaults.handler_prefix),
            tab_size,
            insert_spaces: raw.insert_spaces.unwrap_or(defaults.insert_spaces),
            layout: raw.layout.unwrap_or(defaults.layout),
        })
    }

    /// Read a settings file; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, PropscopeError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PropscopeError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    /// Take the library version recorded for `workspace`, if any.
    pub fn for_workspace(mut self, store: &WorkspaceStore, workspace: &str) -> Self {
        if let Some(version) = store.recorded_version(workspace) {
            self.library_version = version;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceRecord {
    antd_version: LibraryVersion,
}

/// Per-workspace records persisted by the settings UI. Read-only here.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceStore {
    records: HashMap<String, WorkspaceRecord>,
}

impl WorkspaceStore {
    pub fn from_json(text: &str) -> Result<Self, PropscopeError> {
        let records = serde_json::from_str(text)
            .map_err(|e| PropscopeError::Config(format!("workspace store: {e}")))?;
        Ok(Self { records })
    }

    /// Load the store; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, PropscopeError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PropscopeError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    fn recorded_version(&self, workspace: &str) -> Option<LibraryVersion> {
        self.records.get(workspace).map(|r| r.antd_version)
    }

    /// Library version for a workspace; unknown workspaces get version 3.
    pub fn version_for(&self, workspace: &str) -> LibraryVersion {
        self.recorded_version(workspace).unwrap_or_default()
    }
}

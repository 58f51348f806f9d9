use std::collections::HashMap;

use serde::Deserialize;

use crate::error::PropscopeError;
use crate::util::decamelize;

/// One tracked component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    /// Registry key, dot-qualified for sub-components (`Table.Column`).
    pub name: String,
    /// Attributes offered for hover and completion, in display order.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Slug of the documentation page.
    #[serde(default)]
    doc_alias: Option<String>,
}

impl ComponentEntry {
    pub fn new(name: impl Into<String>, attributes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            attributes,
            doc_alias: None,
        }
    }

    pub fn with_doc_alias(mut self, alias: impl Into<String>) -> Self {
        self.doc_alias = Some(alias.into());
        self
    }

    /// Explicit alias, else the hyphenated parent name:
    /// `AutoComplete` gives `auto-complete`, `Table.Column` gives `table`.
    pub fn doc_alias(&self) -> String {
        match &self.doc_alias {
            Some(alias) => alias.clone(),
            None => decamelize(self.name.split('.').next().unwrap_or(&self.name)),
        }
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }
}

/// Immutable set of tracked components, in load order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<ComponentEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build from entries. Names must be unique; repeated attributes are
    /// collapsed, keeping the first.
    pub fn new(entries: Vec<ComponentEntry>) -> Result<Self, PropscopeError> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut kept = Vec::with_capacity(entries.len());
        for mut entry in entries {
            if index.contains_key(&entry.name) {
                return Err(PropscopeError::DuplicateComponent(entry.name));
            }
            let mut seen = std::collections::HashSet::new();
            entry.attributes.retain(|a| seen.insert(a.clone()));
            index.insert(entry.name.clone(), kept.len());
            kept.push(entry);
        }
        Ok(Self {
            entries: kept,
            index,
        })
    }

    pub fn get(&self, name: &str) -> Option<&ComponentEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registry keys in load order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Build-time documentation tables for the component library.
//!
//! One snapshot per library major version, embedded in the binary. Each
//! snapshot holds the component registry, per-attribute docs and the raw
//! reference table for each component, in both documentation languages.

mod props;
mod registry;

pub use props::{LanguageMap, PropDoc, LANGUAGES};
pub use registry::{ComponentEntry, Registry};

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::config::{DocLanguage, LibraryVersion};
use crate::error::PropscopeError;

const EMBEDDED_V3: &str = include_str!("../resources/v3.json");
const EMBEDDED_V4: &str = include_str!("../resources/v4.json");

type PropTable = HashMap<String, HashMap<String, PropDoc>>;
type ReferenceTables = HashMap<String, String>;

#[derive(Deserialize)]
struct RawCatalog {
    components: Vec<ComponentEntry>,
    props: LanguageMap<PropTable>,
    #[serde(default)]
    tables: LanguageMap<ReferenceTables>,
}

/// Documentation snapshot for one library major version.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: LibraryVersion,
    registry: Registry,
    props: LanguageMap<PropTable>,
    tables: LanguageMap<ReferenceTables>,
}

impl Catalog {
    /// Parse and validate a snapshot. `name` labels errors.
    ///
    /// Docs for components or attributes the registry does not list are
    /// dropped with a warning.
    pub fn from_json(
        text: &str,
        version: LibraryVersion,
        name: &str,
    ) -> Result<Self, PropscopeError> {
        let raw: RawCatalog =
            serde_json::from_str(text).map_err(|source| PropscopeError::Resource {
                name: name.to_string(),
                source,
            })?;
        let registry = Registry::new(raw.components)?;
        let mut props = raw.props;
        let mut tables = raw.tables;

        for language in LANGUAGES {
            props.get_mut(language).retain(|component, attrs| {
                let Some(entry) = registry.get(component) else {
                    tracing::warn!(
                        resource = name,
                        component = %component,
                        "docs for unregistered component dropped"
                    );
                    return false;
                };
                attrs.retain(|attribute, _| {
                    let known = entry.has_attribute(attribute);
                    if !known {
                        tracing::warn!(
                            resource = name,
                            component = %component,
                            attribute = %attribute,
                            "docs for unlisted attribute dropped"
                        );
                    }
                    known
                });
                true
            });
            tables.get_mut(language).retain(|component, _| {
                let known = registry.contains(component);
                if !known {
                    tracing::warn!(
                        resource = name,
                        component = %component,
                        "table for unregistered component dropped"
                    );
                }
                known
            });
        }

        tracing::debug!(resource = name, components = registry.len(), "catalog loaded");
        Ok(Self {
            version,
            registry,
            props,
            tables,
        })
    }

    pub fn version(&self) -> LibraryVersion {
        self.version
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Attributes offered for `component`; `None` when it is not tracked.
    pub fn attributes(&self, component: &str) -> Option<&[String]> {
        self.registry.get(component).map(|e| e.attributes.as_slice())
    }

    pub fn prop_doc(
        &self,
        language: DocLanguage,
        component: &str,
        attribute: &str,
    ) -> Option<&PropDoc> {
        self.props.get(language).get(component)?.get(attribute)
    }

    /// Raw reference-table markdown for `component`.
    pub fn table(&self, language: DocLanguage, component: &str) -> Option<&str> {
        self.tables
            .get(language)
            .get(component)
            .map(String::as_str)
    }
}

/// Snapshots for every supported library version.
#[derive(Debug, Clone)]
pub struct Catalogs {
    v3: Catalog,
    v4: Catalog,
}

impl Catalogs {
    /// The snapshots compiled into the binary.
    pub fn embedded() -> Result<Self, PropscopeError> {
        Ok(Self {
            v3: Catalog::from_json(EMBEDDED_V3, LibraryVersion::V3, "v3.json")?,
            v4: Catalog::from_json(EMBEDDED_V4, LibraryVersion::V4, "v4.json")?,
        })
    }

    /// Load `v3.json` and `v4.json` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, PropscopeError> {
        let load = |file: &str, version| -> Result<Catalog, PropscopeError> {
            let path = dir.join(file);
            let text = std::fs::read_to_string(&path).map_err(|e| PropscopeError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            Catalog::from_json(&text, version, file)
        };
        Ok(Self {
            v3: load("v3.json", LibraryVersion::V3)?,
            v4: load("v4.json", LibraryVersion::V4)?,
        })
    }

    pub fn from_snapshots(v3: Catalog, v4: Catalog) -> Self {
        Self { v3, v4 }
    }

    pub fn get(&self, version: LibraryVersion) -> &Catalog {
        match version {
            LibraryVersion::V3 => &self.v3,
            LibraryVersion::V4 => &self.v4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "components": [
            { "name": "Affix", "attributes": ["onChange"] },
            { "name": "Table.Column", "docAlias": "table", "attributes": ["onCell"] }
        ],
        "props": {
            "en": {
                "Affix": {
                    "onChange": { "description": "D", "type": "T", "default": "Def", "version": "V" },
                    "offsetTop": { "description": "unlisted" }
                },
                "Ghost": { "onBoo": {} }
            },
            "zh": { "Affix": { "onChange": { "description": "描述" } } }
        },
        "tables": { "en": { "Affix": "| a |", "Ghost": "| b |" }, "zh": {} }
    }"#;

    #[test]
    fn validation_drops_mismatched_docs() {
        let cat = Catalog::from_json(SMALL, LibraryVersion::V3, "small").unwrap();
        let doc = cat.prop_doc(DocLanguage::En, "Affix", "onChange").unwrap();
        assert_eq!(doc.type_, "T");
        assert!(cat.prop_doc(DocLanguage::En, "Affix", "offsetTop").is_none());
        assert!(cat.prop_doc(DocLanguage::En, "Ghost", "onBoo").is_none());
        assert_eq!(cat.table(DocLanguage::En, "Affix"), Some("| a |"));
        assert!(cat.table(DocLanguage::En, "Ghost").is_none());
        assert_eq!(
            cat.prop_doc(DocLanguage::Zh, "Affix", "onChange").unwrap().version,
            ""
        );
    }

    #[test]
    fn missing_language_fails_to_load() {
        let text = r#"{ "components": [], "props": { "en": {} } }"#;
        let err = Catalog::from_json(text, LibraryVersion::V3, "bad").unwrap_err();
        assert!(matches!(err, PropscopeError::Resource { name, .. } if name == "bad"));
    }

    #[test]
    fn embedded_snapshots_are_consistent() {
        let catalogs = Catalogs::embedded().unwrap();
        for version in [LibraryVersion::V3, LibraryVersion::V4] {
            let cat = catalogs.get(version);
            assert_eq!(cat.version(), version);
            assert!(!cat.registry().is_empty());
            for name in cat.registry().names() {
                for attribute in cat.attributes(name).unwrap() {
                    for language in LANGUAGES {
                        assert!(
                            cat.prop_doc(language, name, attribute).is_some(),
                            "{version:?} {name}.{attribute} lacks {language:?} docs"
                        );
                    }
                }
            }
        }
        let v3 = catalogs.get(LibraryVersion::V3);
        assert!(v3.attributes("Affix").unwrap().iter().any(|a| a == "onChange"));
        assert!(v3.attributes("Select.Option").unwrap().is_empty());
        assert!(catalogs
            .get(LibraryVersion::V4)
            .prop_doc(DocLanguage::En, "Select", "onClear")
            .is_some());
        assert!(v3.prop_doc(DocLanguage::En, "Select", "onClear").is_none());
    }

    #[test]
    fn from_dir_reads_both_versions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("v3.json"), SMALL).unwrap();
        std::fs::write(dir.path().join("v4.json"), SMALL).unwrap();
        let catalogs = Catalogs::from_dir(dir.path()).unwrap();
        assert!(catalogs.get(LibraryVersion::V4).registry().contains("Table.Column"));

        std::fs::remove_file(dir.path().join("v4.json")).unwrap();
        assert!(matches!(
            Catalogs::from_dir(dir.path()),
            Err(PropscopeError::Io { .. })
        ));
    }
}

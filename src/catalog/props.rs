use serde::Deserialize;

use crate::config::DocLanguage;

/// Documentation for one attribute of one component. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PropDoc {
    pub description: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub default: String,
    pub version: String,
}

/// One value per supported documentation language.
///
/// Both fields are required when deserializing, so a table missing a
/// language fails to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LanguageMap<T> {
    pub en: T,
    pub zh: T,
}

impl<T> LanguageMap<T> {
    pub fn get(&self, language: DocLanguage) -> &T {
        match language {
            DocLanguage::En => &self.en,
            DocLanguage::Zh => &self.zh,
        }
    }

    pub fn get_mut(&mut self, language: DocLanguage) -> &mut T {
        match language {
            DocLanguage::En => &mut self.en,
            DocLanguage::Zh => &mut self.zh,
        }
    }
}

pub const LANGUAGES: [DocLanguage; 2] = [DocLanguage::En, DocLanguage::Zh];

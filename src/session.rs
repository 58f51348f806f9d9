use crate::cancel::CancellationToken;
use crate::catalog::{Catalog, Catalogs};
use crate::config::Settings;
use crate::oracle::{SemanticOracle, Semantics};

/// Everything one hover, completion or insertion request works with.
pub struct Session<'a> {
    pub semantics: Semantics<'a>,
    pub catalog: &'a Catalog,
    pub settings: &'a Settings,
}

impl<'a> Session<'a> {
    /// Pick the snapshot for the configured library version.
    pub fn new(
        oracle: &'a mut dyn SemanticOracle,
        catalogs: &'a Catalogs,
        settings: &'a Settings,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            semantics: Semantics::new(oracle, &settings.layout, cancel),
            catalog: catalogs.get(settings.library_version),
            settings,
        }
    }
}

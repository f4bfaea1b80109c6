//! Name-to-factory resolution for transformation steps.
//!
//! A [`Registry`] starts out holding the built-in catalog. Callers can layer
//! their own morphs on top with [`Registry::register_extension`] or
//! [`Registry::load_extension`]; extension entries are consulted first, so an
//! extension registered under a built-in name overrides it.
//!
//! ```
//! use datamorph::error::TransformationError;
//! use datamorph::morph::{Morph, Params};
//! use datamorph::pipeline::Registry;
//! use polars::prelude::DataFrame;
//!
//! #[derive(Debug)]
//! struct Identity;
//!
//! impl Morph for Identity {
//!     fn name(&self) -> &'static str {
//!         "Identity"
//!     }
//!
//!     fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
//!         Ok(df.clone())
//!     }
//! }
//!
//! fn identity(_: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
//!     Ok(Box::new(Identity))
//! }
//!
//! let mut registry = Registry::default();
//! registry.register_extension("Identity", identity);
//! assert!(registry.resolve("Identity").is_ok());
//! ```

use crate::error::{MorphError, Result};
use crate::morph::{
    ColumnsOperator, CreateColumn, DeleteDataFrame, DropNA, FillNA, FilterRows, MathOperator,
    MergeDataFrames, MorphFactory, NormalizeColumn, RemoveColumns, RenameColumn, SaveDataFrame,
};
use std::collections::HashMap;

/// Built-in transformations, by configuration name.
const BUILTINS: &[(&str, MorphFactory)] = &[
    (CreateColumn::NAME, CreateColumn::from_params),
    ("AddColumn", CreateColumn::from_params),
    (ColumnsOperator::NAME, ColumnsOperator::from_params),
    (MathOperator::NAME, MathOperator::from_params),
    (NormalizeColumn::NAME, NormalizeColumn::from_params),
    (RemoveColumns::NAME, RemoveColumns::from_params),
    (RenameColumn::NAME, RenameColumn::from_params),
    (FillNA::NAME, FillNA::from_params),
    (DropNA::NAME, DropNA::from_params),
    (FilterRows::NAME, FilterRows::from_params),
    (MergeDataFrames::NAME, MergeDataFrames::from_params),
    (SaveDataFrame::NAME, SaveDataFrame::from_params),
    (DeleteDataFrame::NAME, DeleteDataFrame::from_params),
];

/// A bundle of user morphs registered in one call.
pub trait Extension {
    fn register(&self, registry: &mut Registry);
}

/// Where a resolved factory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Extension,
    Builtin,
}

#[derive(Debug, Clone)]
pub struct Registry {
    extensions: HashMap<String, MorphFactory>,
    builtins: HashMap<String, MorphFactory>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// A registry holding only the built-in catalog.
    pub fn builtin() -> Self {
        Self {
            extensions: HashMap::new(),
            builtins: BUILTINS
                .iter()
                .map(|(name, factory)| ((*name).to_owned(), *factory))
                .collect(),
        }
    }

    /// A registry with no entries at all.
    pub fn empty() -> Self {
        Self {
            extensions: HashMap::new(),
            builtins: HashMap::new(),
        }
    }

    /// Register a user morph. Later registrations under the same name replace
    /// earlier ones; any registration shadows a built-in of the same name.
    pub fn register_extension(&mut self, name: impl Into<String>, factory: MorphFactory) {
        let name = name.into();
        if self.builtins.contains_key(&name) {
            tracing::debug!(name = %name, "Extension overrides built-in transformation");
        }
        self.extensions.insert(name, factory);
    }

    /// Register every morph an [`Extension`] provides.
    pub fn load_extension(&mut self, extension: &dyn Extension) {
        extension.register(self);
    }

    /// Find the factory for `name`, extensions first.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::UnknownTransformation`] if no entry matches.
    pub fn resolve(&self, name: &str) -> Result<MorphFactory> {
        self.lookup(name)
            .map(|(factory, _)| factory)
            .ok_or_else(|| MorphError::UnknownTransformation(name.to_owned()))
    }

    /// Like [`Registry::resolve`], also reporting which catalog matched.
    pub fn lookup(&self, name: &str) -> Option<(MorphFactory, Source)> {
        self.extensions
            .get(name)
            .map(|f| (*f, Source::Extension))
            .or_else(|| self.builtins.get(name).map(|f| (*f, Source::Builtin)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All resolvable names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .extensions
            .keys()
            .chain(self.builtins.keys().filter(|k| !self.extensions.contains_key(*k)))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformationError;
    use crate::morph::{Datasets, Morph, Params};
    use polars::prelude::*;
    use serde_yaml::Mapping;

    #[derive(Debug)]
    struct Marker(&'static str);

    impl Morph for Marker {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, df: &DataFrame) -> std::result::Result<DataFrame, TransformationError> {
            Ok(df.clone())
        }
    }

    fn custom_fill(_: &Params<'_>) -> std::result::Result<Box<dyn Morph>, TransformationError> {
        Ok(Box::new(Marker("custom FillNA")))
    }

    fn build(registry: &Registry, name: &str) -> Box<dyn Morph> {
        let values = Mapping::new();
        let datasets = Datasets::new();
        let factory = registry.resolve(name).unwrap();
        factory(&Params::new(&values, &datasets)).unwrap()
    }

    struct Pack;

    impl Extension for Pack {
        fn register(&self, registry: &mut Registry) {
            registry.register_extension("Custom", custom_fill);
        }
    }

    #[test]
    fn test_builtins_resolve() {
        let registry = Registry::default();
        for (name, _) in BUILTINS {
            assert!(registry.contains(name), "{name} should resolve");
        }
        assert_eq!(registry.lookup("FillNA").map(|(_, s)| s), Some(Source::Builtin));
    }

    #[test]
    fn test_extension_overrides_builtin() {
        let mut registry = Registry::default();
        registry.register_extension("FillNA", custom_fill);

        assert_eq!(
            registry.lookup("FillNA").map(|(_, s)| s),
            Some(Source::Extension)
        );
        assert_eq!(build(&registry, "FillNA").name(), "custom FillNA");
    }

    #[test]
    fn test_unknown_transformation() {
        let registry = Registry::default();
        assert!(matches!(
            registry.resolve("Explode"),
            Err(MorphError::UnknownTransformation(ref name)) if name == "Explode"
        ));
    }

    #[test]
    fn test_load_extension() {
        let mut registry = Registry::empty();
        assert!(!registry.contains("Custom"));
        registry.load_extension(&Pack);
        assert_eq!(registry.names(), ["Custom"]);
    }

    #[test]
    fn test_names_do_not_repeat_overrides() {
        let mut registry = Registry::default();
        registry.register_extension("FillNA", custom_fill);
        let names = registry.names();
        assert_eq!(names.iter().filter(|n| **n == "FillNA").count(), 1);
        assert_eq!(names.len(), BUILTINS.len());
    }
}

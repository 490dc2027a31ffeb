//! Well-known symbol resolution.
//!
//! The generator cares about a handful of marker types: the change and
//! pre-change notification interfaces, the platform base types whose
//! instances notify through callback registration or key-value observing,
//! and the extension class that declares the observation methods. Resolution
//! walks the semantic snapshot once per compilation and is cached by
//! compilation identity; repeat calls return the identity-equal handle.

use crate::symbols::{Compilation, CompilationId};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Fully qualified names of the marker types the generator recognizes.
pub mod well_known {
    /// Event-based change notification marker.
    pub const NOTIFY_PROPERTY_CHANGED: &str = "rxwire::runtime::NotifyPropertyChanged";
    /// Pre-change notification marker.
    pub const NOTIFY_PROPERTY_CHANGING: &str = "rxwire::runtime::NotifyPropertyChanging";
    /// Base type for dependency-property-style platform objects.
    pub const DEPENDENCY_OBJECT: &str = "rxwire::platform::DependencyObject";
    /// Base type for key-value-observing-style platform objects.
    pub const KVO_OBJECT: &str = "rxwire::platform::KvoObject";
    /// The extension class declaring `observe`/`bind`. Invocations resolving
    /// to any other class with the same method names are ignored.
    pub const EXTENSION_CLASS: &str = "rxwire::runtime::ObserveExtensions";
}

/// The resolved marker set for one compilation.
///
/// The notification interface and the extension class must resolve; the
/// platform bases are optional (a compilation may not reference a platform).
#[derive(Clone, Debug)]
pub struct WellKnownSymbols {
    pub notify_changed: String,
    pub notify_changing: Option<String>,
    pub dependency_object: Option<String>,
    pub kvo_object: Option<String>,
    pub extension_class: String,
}

/// The compilation context is missing a required well-known symbol. The
/// pipeline degrades to "feature unavailable" when it sees this.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownError {
    pub missing: &'static str,
}

impl std::fmt::Display for WellKnownError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "well-known symbol `{}` is unresolvable", self.missing)
    }
}

impl std::error::Error for WellKnownError {}

/// Per-pass resolver with a read-mostly cache keyed by compilation identity.
#[derive(Default)]
pub struct SymbolCatalog {
    cache: RwLock<FxHashMap<CompilationId, Arc<WellKnownSymbols>>>,
}

impl SymbolCatalog {
    pub fn new() -> Self {
        SymbolCatalog::default()
    }

    /// Resolve the well-known symbols for `compilation`, at most once per
    /// compilation identity. The returned handle is identity-equal across
    /// repeat calls within the same compilation.
    pub fn resolve(
        &self,
        compilation: &Compilation,
    ) -> Result<Arc<WellKnownSymbols>, WellKnownError> {
        if let Some(cached) = self.cache.read().expect("catalog lock").get(&compilation.id()) {
            return Ok(Arc::clone(cached));
        }

        let resolved = Arc::new(resolve_uncached(compilation)?);
        debug!(
            compilation = compilation.id().0,
            "resolved well-known symbols"
        );
        self.cache
            .write()
            .expect("catalog lock")
            .insert(compilation.id(), Arc::clone(&resolved));
        Ok(resolved)
    }
}

fn resolve_uncached(compilation: &Compilation) -> Result<WellKnownSymbols, WellKnownError> {
    let require = |name: &'static str| -> Result<String, WellKnownError> {
        compilation
            .get_type(name)
            .map(|ty| ty.name.clone())
            .ok_or(WellKnownError { missing: name })
    };
    let optional =
        |name: &str| -> Option<String> { compilation.get_type(name).map(|ty| ty.name.clone()) };

    Ok(WellKnownSymbols {
        notify_changed: require(well_known::NOTIFY_PROPERTY_CHANGED)?,
        notify_changing: optional(well_known::NOTIFY_PROPERTY_CHANGING),
        dependency_object: optional(well_known::DEPENDENCY_OBJECT),
        kvo_object: optional(well_known::KVO_OBJECT),
        extension_class: require(well_known::EXTENSION_CLASS)?,
    })
}

//! Reference table of known services and their action names.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::{Error, Result};

const BUILTIN_CATALOG: &str = include_str!("../data/actions.json");

lazy_static! {
    static ref BUILTIN: Arc<ActionCatalog> = Arc::new(
        ActionCatalog::from_json(BUILTIN_CATALOG).expect("embedded action catalog is valid")
    );
}

/// Read-only mapping from service prefix (`s3`, `iam`, ...) to the action
/// names that service defines.
///
/// Service prefixes are case-sensitive. The catalog is never mutated after
/// construction, so a single instance can be shared between engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ActionCatalog {
    services: BTreeMap<String, BTreeSet<String>>,
}

impl ActionCatalog {
    /// Loads a catalog from `{ "<service>": ["<Action>", ...], ... }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: ActionCatalog = serde_json::from_str(json).map_err(Error::Deserializing)?;
        tracing::debug!(services = catalog.services.len(), "loaded action catalog");
        Ok(catalog)
    }

    /// Catalog embedded in the crate, parsed on first use.
    pub fn builtin() -> Arc<ActionCatalog> {
        Arc::clone(&BUILTIN)
    }

    pub fn has_service(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }

    pub fn actions_for(&self, service: &str) -> Option<&BTreeSet<String>> {
        self.services.get(service)
    }

    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl<S, I, A> FromIterator<(S, I)> for ActionCatalog
where
    S: Into<String>,
    I: IntoIterator<Item = A>,
    A: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (S, I)>>(iter: T) -> Self {
        let mut services: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (service, actions) in iter {
            services
                .entry(service.into())
                .or_default()
                .extend(actions.into_iter().map(Into::into));
        }
        Self { services }
    }
}

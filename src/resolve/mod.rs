//! Structure resolution for registry entries.
//!
//! The [`Resolver`] turns one [`RegistryEntry`] into a raw structure string
//! by an ordered strategy where the first success wins:
//!
//! 1. entries that skip external lookup use their literal structure and
//!    never touch the network;
//! 2. otherwise every search alias is queried in order through a
//!    [`StructureLookup`], pausing between unsuccessful attempts;
//! 3. when no alias yields a structure the curated fallback is used.
//!
//! Lookup failures are logged and swallowed. A lookup answer overrides the
//! curated fallback even when the two disagree.

mod lookup;
mod pubchem;

pub use lookup::{LookupError, PropertyBundle, StructureLookup};
pub use pubchem::{DEFAULT_BASE_URL, LookupConfig, PubChemClient, parse_properties};

use crate::model::registry::RegistryEntry;
use std::fmt;
use std::time::Duration;

pub const FALLBACK_SOURCE: &str = "Fallback structure";
pub const LITERAL_SOURCE: &str = "Predefined scaffold";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    ExternalLookup,
    Fallback,
    Literal,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::ExternalLookup => write!(f, "external lookup"),
            SourceKind::Fallback => write!(f, "fallback"),
            SourceKind::Literal => write!(f, "literal"),
        }
    }
}

/// A structure string together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStructure {
    pub raw: String,
    pub source_kind: SourceKind,
    /// Provenance shown in the exported record, e.g. `PubChem (G150)`.
    pub source_detail: String,
    /// Everything the lookup returned alongside the structure.
    pub properties: Option<PropertyBundle>,
}

type Pause = Box<dyn Fn(Duration)>;

pub struct Resolver {
    lookup: Option<Box<dyn StructureLookup>>,
    delay: Duration,
    pause: Pause,
}

impl Resolver {
    /// A resolver that never queries an external service.
    pub fn offline() -> Self {
        Self {
            lookup: None,
            delay: Duration::ZERO,
            pause: Box::new(std::thread::sleep),
        }
    }

    pub fn new(lookup: Box<dyn StructureLookup>, delay: Duration) -> Self {
        Self {
            lookup: Some(lookup),
            delay,
            pause: Box::new(std::thread::sleep),
        }
    }

    /// Builds a PubChem-backed resolver, or an offline one without config.
    pub fn from_config(config: Option<&LookupConfig>) -> Result<Self, LookupError> {
        match config {
            Some(config) => {
                let client = PubChemClient::new(config)?;
                Ok(Self::new(Box::new(client), config.delay))
            }
            None => Ok(Self::offline()),
        }
    }

    /// Replaces the inter-attempt sleep, mainly for tests.
    pub fn with_pause(mut self, pause: impl Fn(Duration) + 'static) -> Self {
        self.pause = Box::new(pause);
        self
    }

    #[inline]
    pub fn is_offline(&self) -> bool {
        self.lookup.is_none()
    }

    /// Resolves one entry, or `None` when no structure is available at all.
    pub fn resolve(&self, entry: &RegistryEntry) -> Option<ResolvedStructure> {
        if entry.skip_external_lookup {
            return usable(entry.literal_structure.as_deref()).map(|raw| ResolvedStructure {
                raw: raw.to_string(),
                source_kind: SourceKind::Literal,
                source_detail: LITERAL_SOURCE.to_string(),
                properties: None,
            });
        }

        if let Some(lookup) = &self.lookup {
            if let Some(resolved) = self.query_aliases(lookup.as_ref(), entry) {
                return Some(resolved);
            }
        }

        let fallback = usable(entry.fallback_structure.as_deref());
        if fallback.is_none() {
            tracing::warn!(identifier = %entry.identifier, "no structure available");
        }
        fallback.map(|raw| ResolvedStructure {
            raw: raw.to_string(),
            source_kind: SourceKind::Fallback,
            source_detail: FALLBACK_SOURCE.to_string(),
            properties: None,
        })
    }

    fn query_aliases(
        &self,
        lookup: &dyn StructureLookup,
        entry: &RegistryEntry,
    ) -> Option<ResolvedStructure> {
        for (attempt, alias) in entry.lookup_terms().into_iter().enumerate() {
            if attempt > 0 && !self.delay.is_zero() {
                (self.pause)(self.delay);
            }

            match lookup.lookup_by_name(alias) {
                Ok(Some(bundle)) => {
                    if let Some(raw) = bundle.usable_structure().map(str::to_string) {
                        tracing::info!(identifier = %entry.identifier, alias, "structure found");
                        return Some(ResolvedStructure {
                            raw,
                            source_kind: SourceKind::ExternalLookup,
                            source_detail: format!("{} ({})", lookup.service_name(), alias),
                            properties: Some(bundle),
                        });
                    }
                    tracing::debug!(identifier = %entry.identifier, alias, "match without structure");
                }
                Ok(None) => {
                    tracing::debug!(identifier = %entry.identifier, alias, "no match");
                }
                Err(e) => {
                    tracing::warn!(
                        identifier = %entry.identifier,
                        alias,
                        %e,
                        "structure lookup failed; trying next source"
                    );
                }
            }
        }
        None
    }
}

fn usable(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeLookup {
        answers: HashMap<String, Result<Option<PropertyBundle>, u16>>,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl FakeLookup {
        fn answer(mut self, alias: &str, smiles: &str) -> Self {
            let bundle = PropertyBundle {
                structure: Some(smiles.to_string()),
                name: Some(format!("{alias} name")),
                ..PropertyBundle::default()
            };
            self.answers.insert(alias.to_string(), Ok(Some(bundle)));
            self
        }

        fn fail(mut self, alias: &str, status: u16) -> Self {
            self.answers.insert(alias.to_string(), Err(status));
            self
        }
    }

    impl StructureLookup for FakeLookup {
        fn service_name(&self) -> &str {
            "PubChem"
        }

        fn lookup_by_name(&self, alias: &str) -> Result<Option<PropertyBundle>, LookupError> {
            self.calls.borrow_mut().push(alias.to_string());
            match self.answers.get(alias) {
                Some(Ok(bundle)) => Ok(bundle.clone()),
                Some(Err(status)) => Err(LookupError::Status {
                    status: *status,
                    alias: alias.to_string(),
                }),
                None => Ok(None),
            }
        }
    }

    fn resolver(lookup: FakeLookup) -> (Resolver, Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<Duration>>>) {
        let calls = Rc::clone(&lookup.calls);
        let pauses = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&pauses);
        let resolver = Resolver::new(Box::new(lookup), Duration::from_millis(500))
            .with_pause(move |d| recorded.borrow_mut().push(d));
        (resolver, calls, pauses)
    }

    fn candidate() -> RegistryEntry {
        RegistryEntry::candidate("G150", "Roche", "s", "p", &["G150", "G-150"], "c1ccncc1")
    }

    #[test]
    fn literal_entries_never_query() {
        let (resolver, calls, _) = resolver(FakeLookup::default().answer("Core", "C"));
        let entry = RegistryEntry::scaffold("Core", "d", &[], "c1ccccc1");
        let resolved = resolver.resolve(&entry).unwrap();
        assert_eq!(resolved.source_kind, SourceKind::Literal);
        assert_eq!(resolved.source_detail, LITERAL_SOURCE);
        assert_eq!(resolved.raw, "c1ccccc1");
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn first_answering_alias_wins() {
        let (resolver, calls, pauses) = resolver(FakeLookup::default().answer("G150", "CCO"));
        let resolved = resolver.resolve(&candidate()).unwrap();
        assert_eq!(resolved.source_kind, SourceKind::ExternalLookup);
        assert_eq!(resolved.source_detail, "PubChem (G150)");
        assert_eq!(resolved.raw, "CCO");
        assert_eq!(
            resolved.properties.unwrap().name.as_deref(),
            Some("G150 name")
        );
        assert_eq!(*calls.borrow(), vec!["G150"]);
        assert!(pauses.borrow().is_empty());
    }

    #[test]
    fn pauses_only_between_failed_attempts() {
        let (resolver, calls, pauses) =
            resolver(FakeLookup::default().fail("G150", 503).answer("G-150", "CCO"));
        let resolved = resolver.resolve(&candidate()).unwrap();
        assert_eq!(resolved.source_detail, "PubChem (G-150)");
        assert_eq!(*calls.borrow(), vec!["G150", "G-150"]);
        assert_eq!(*pauses.borrow(), vec![Duration::from_millis(500)]);
    }

    #[test]
    fn falls_back_when_no_alias_answers() {
        let (resolver, calls, pauses) = resolver(FakeLookup::default());
        let resolved = resolver.resolve(&candidate()).unwrap();
        assert_eq!(resolved.source_kind, SourceKind::Fallback);
        assert_eq!(resolved.source_detail, FALLBACK_SOURCE);
        assert_eq!(resolved.raw, "c1ccncc1");
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(pauses.borrow().len(), 1);
    }

    #[test]
    fn blank_structure_in_answer_is_ignored() {
        let (resolver, _, _) = resolver(FakeLookup::default().answer("G150", " "));
        let resolved = resolver.resolve(&candidate()).unwrap();
        assert_eq!(resolved.source_kind, SourceKind::Fallback);
    }

    #[test]
    fn offline_resolver_uses_fallback_directly() {
        let resolver = Resolver::offline();
        assert!(resolver.is_offline());
        let resolved = resolver.resolve(&candidate()).unwrap();
        assert_eq!(resolved.source_kind, SourceKind::Fallback);
    }

    #[test]
    fn nothing_available_resolves_to_none() {
        let mut entry = candidate();
        entry.fallback_structure = None;
        let (resolver, _, _) = resolver(FakeLookup::default());
        assert_eq!(resolver.resolve(&entry), None);
    }
}

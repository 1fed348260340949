use indexmap::IndexMap;

use crate::builder::registry::NodeId;
use crate::lifetime::{Annotation, Lifetime};
use crate::signature::Signature;
use crate::util::any::Object;

/// Override metadata accumulated by a node across registrations.
///
/// Once an override is recorded, a different one for the same target is only
/// accepted if overwriting is allowed. Empty annotations never replace a
/// recorded override.
#[derive(Debug, Default)]
pub struct OverrideMetadata {
    lifetime: Option<Lifetime>,
    injections: IndexMap<Signature, InjectionRecord>,
}

impl OverrideMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lifetime(&self) -> Option<Lifetime> {
        self.lifetime
    }

    /// Records the lifetime annotation of the binding.
    ///
    /// # Errors
    ///
    /// Returns the recorded lifetime if it differs from `lifetime` and
    /// overwriting is disallowed.
    pub fn register_lifetime(
        &mut self,
        lifetime: Option<Lifetime>,
        allow_overwrite: bool,
    ) -> Result<(), Lifetime> {
        match (self.lifetime, lifetime) {
            (_, None) => Ok(()),
            (Some(existing), Some(requested)) if existing != requested && !allow_overwrite => {
                Err(existing)
            }
            (_, Some(requested)) => {
                self.lifetime = Some(requested);
                Ok(())
            }
        }
    }

    /// Records how the node is injected into `consumer`.
    ///
    /// # Errors
    ///
    /// Returns the recorded annotation if it differs from `annotation` and
    /// overwriting is disallowed.
    pub fn register_injection(
        &mut self,
        consumer: &Signature,
        annotation: &Annotation,
        allow_overwrite: bool,
    ) -> Result<(), Annotation> {
        match self.injections.get_mut(consumer) {
            None => {
                self.injections
                    .insert(consumer.clone(), InjectionRecord::new(annotation.clone()));
                Ok(())
            }
            Some(record) if annotation.is_empty() || record.annotation == *annotation => Ok(()),
            Some(record) if record.annotation.is_empty() || allow_overwrite => {
                *record = InjectionRecord::new(annotation.clone());
                Ok(())
            }
            Some(record) => Err(record.annotation.clone()),
        }
    }

    pub fn injection(&self, consumer: &str) -> Option<&InjectionRecord> {
        self.injections.get(consumer)
    }

    pub fn injection_mut(&mut self, consumer: &str) -> Option<&mut InjectionRecord> {
        self.injections.get_mut(consumer)
    }

    /// Signatures of all consumers the node is injected into.
    pub fn consumers(&self) -> impl Iterator<Item = &Signature> {
        self.injections.keys()
    }
}

/// How a node is injected into one consumer.
#[derive(Debug, Default)]
pub struct InjectionRecord {
    annotation: Annotation,
    shared: Option<SharedObject>,
}

/// An object produced by one revision of a binding.
#[derive(Debug)]
struct SharedObject {
    object: Object,
    source: NodeId,
    revision: u64,
}

impl InjectionRecord {
    fn new(annotation: Annotation) -> Self {
        Self {
            annotation,
            shared: None,
        }
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// The object shared between the consumer's instances, if it was produced
    /// by `source` at its current `revision`.
    pub fn shared(&self, source: NodeId, revision: u64) -> Option<&Object> {
        self.shared
            .as_ref()
            .filter(|shared| shared.source == source && shared.revision == revision)
            .map(|shared| &shared.object)
    }

    pub fn set_shared(&mut self, object: Object, source: NodeId, revision: u64) {
        self.shared = Some(SharedObject {
            object,
            source,
            revision,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_lifetime_succeeds() {
        let mut metadata = OverrideMetadata::new();

        assert!(metadata.register_lifetime(None, false).is_ok());
        assert_eq!(metadata.lifetime(), None);
        assert!(metadata.register_lifetime(Some(Lifetime::Singleton), false).is_ok());
        assert!(metadata.register_lifetime(Some(Lifetime::Singleton), false).is_ok());
        assert!(metadata.register_lifetime(None, false).is_ok());
        assert_eq!(metadata.lifetime(), Some(Lifetime::Singleton));
    }

    #[test]
    fn register_lifetime_fails_when_overwrite_disallowed() {
        let mut metadata = OverrideMetadata::new();
        metadata
            .register_lifetime(Some(Lifetime::Singleton), false)
            .unwrap();

        assert_eq!(
            metadata.register_lifetime(Some(Lifetime::Lazy), false),
            Err(Lifetime::Singleton)
        );
        assert!(metadata.register_lifetime(Some(Lifetime::Lazy), true).is_ok());
        assert_eq!(metadata.lifetime(), Some(Lifetime::Lazy));
    }

    #[test]
    fn register_injection_succeeds() {
        let mut metadata = OverrideMetadata::new();
        let consumer = Signature::new("app::B(app::A)");
        let per_call = Annotation::new().with_lifetime(Lifetime::Transient);

        assert!(metadata
            .register_injection(&consumer, &Annotation::new(), false)
            .is_ok());
        assert!(metadata.register_injection(&consumer, &per_call, false).is_ok());
        assert!(metadata
            .register_injection(&consumer, &Annotation::new(), false)
            .is_ok());
        assert_eq!(
            metadata
                .injection("app::B(app::A)")
                .and_then(|r| r.annotation().lifetime()),
            Some(Lifetime::Transient)
        );
        assert_eq!(metadata.consumers().count(), 1);
    }

    #[test]
    fn register_injection_fails_when_overwrite_disallowed() {
        let mut metadata = OverrideMetadata::new();
        let consumer = Signature::new("app::B(app::A)");
        let singleton = Annotation::new().with_lifetime(Lifetime::Singleton);
        let lazy = Annotation::new().with_lifetime(Lifetime::Lazy);

        metadata.register_injection(&consumer, &singleton, false).unwrap();
        assert_eq!(
            metadata.register_injection(&consumer, &lazy, false),
            Err(singleton)
        );
        assert!(metadata.register_injection(&consumer, &lazy, true).is_ok());
    }

    #[test]
    fn shared_object_is_tied_to_source_revision() {
        let mut metadata = OverrideMetadata::new();
        let consumer = Signature::new("app::B(app::A)");
        metadata
            .register_injection(&consumer, &Annotation::new(), true)
            .unwrap();

        let record = metadata.injection_mut("app::B(app::A)").unwrap();
        let source = NodeId::default();
        record.set_shared(std::sync::Arc::new(1i32), source, 3);

        assert!(record.shared(source, 3).is_some());
        assert!(record.shared(source, 4).is_none());
    }
}

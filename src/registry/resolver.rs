use std::sync::{Arc, OnceLock, Weak};

use crate::error::BindError;
use crate::info::TypeDecl;
use crate::serializer::Serializer;

// -----------------------------------------------------------------------------
// DependencyResolver

/// The ordered serializer registry.
///
/// Resolution is a fresh linear scan on every call: the first serializer
/// whose [`matches`](Serializer::matches) predicate accepts the declaration
/// wins. Order therefore IS the precedence model; specific serializers go in
/// front of catch-alls. No match is [`BindError::NoSerializerFound`].
#[derive(Debug)]
pub struct DependencyResolver {
    serializers: Vec<Arc<dyn Serializer>>,
}

impl DependencyResolver {
    /// Resolves the serializer responsible for the given declaration.
    pub fn resolve(&self, decl: &TypeDecl) -> Result<Arc<dyn Serializer>, BindError> {
        self.serializers
            .iter()
            .find(|serializer| serializer.matches(decl))
            .cloned()
            .ok_or_else(|| BindError::no_serializer(decl))
    }

    /// Number of registered serializers.
    #[inline]
    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    /// Returns `true` if no serializers are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }
}

// -----------------------------------------------------------------------------
// ResolverAware

/// A serializer that recurses through the resolver it is registered in.
///
/// The resolver owns its serializers, so a serializer cannot hold the
/// resolver by `Arc` without a cycle. Construction runs in two phases
/// instead: [`ResolverBuilder::build`] creates the resolver first, then calls
/// `attach` on every aware serializer with a reference it can downgrade.
pub trait ResolverAware: Send + Sync {
    /// Receives the finished resolver after construction.
    fn attach(&self, resolver: &Arc<DependencyResolver>);
}

/// A serializer's write-once handle to its resolver.
///
/// Holds a [`Weak`] so the resolver's ownership of the serializer does not
/// become a reference cycle. [`get`](Self::get) fails with
/// [`BindError::ResolverDetached`] before [`attach`](Self::attach) or after
/// the resolver is dropped.
pub struct ResolverRef {
    slot: OnceLock<Weak<DependencyResolver>>,
}

impl ResolverRef {
    /// Creates a detached handle.
    #[inline]
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Stores the resolver reference. Later calls are ignored.
    pub fn attach(&self, resolver: &Arc<DependencyResolver>) {
        let _ = self.slot.set(Arc::downgrade(resolver));
    }

    /// Returns the resolver, if attached and still alive.
    pub fn get(&self) -> Result<Arc<DependencyResolver>, BindError> {
        self.slot
            .get()
            .and_then(Weak::upgrade)
            .ok_or(BindError::ResolverDetached)
    }
}

impl Default for ResolverRef {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// ResolverBuilder

/// Collects serializers in precedence order and wires up the two-phase
/// construction.
///
/// ```
/// # use std::sync::Arc;
/// # use databind::registry::ResolverBuilder;
/// # use databind::serializer::ScalarSerializer;
/// let resolver = ResolverBuilder::new()
///     .with(Arc::new(ScalarSerializer::<i64>::new()))
///     .build();
/// ```
#[derive(Default)]
pub struct ResolverBuilder {
    serializers: Vec<Arc<dyn Serializer>>,
    aware: Vec<Arc<dyn ResolverAware>>,
}

impl ResolverBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a serializer. Registration order is match order.
    pub fn with(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializers.push(serializer);
        self
    }

    /// Appends a serializer that needs the resolver back after construction.
    pub fn with_aware<S>(mut self, serializer: Arc<S>) -> Self
    where
        S: Serializer + ResolverAware + 'static,
    {
        self.serializers.push(serializer.clone());
        self.aware.push(serializer);
        self
    }

    /// Appends an already type-erased serializer together with its aware
    /// handle. Both must point at the same object.
    pub fn with_erased_aware(
        mut self,
        serializer: Arc<dyn Serializer>,
        aware: Arc<dyn ResolverAware>,
    ) -> Self {
        self.serializers.push(serializer);
        self.aware.push(aware);
        self
    }

    /// Builds the resolver and attaches it to every aware serializer.
    pub fn build(self) -> Arc<DependencyResolver> {
        let resolver = Arc::new(DependencyResolver {
            serializers: self.serializers,
        });
        for serializer in &self.aware {
            serializer.attach(&resolver);
        }
        resolver
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Primitive;
    use crate::reflection::Reflect;
    use crate::registry::TypeTable;

    struct Fixed(&'static str);

    impl Serializer for Fixed {
        fn matches(&self, decl: &TypeDecl) -> bool {
            decl.name == self.0
        }

        fn serialize(&self, _value: &dyn Reflect) -> Result<Primitive, BindError> {
            Ok(Primitive::from(self.0))
        }

        fn unserialize_value(
            &self,
            _data: &Primitive,
            _decl: &TypeDecl,
        ) -> Result<Box<dyn Reflect>, BindError> {
            Ok(Box::new(String::from(self.0)))
        }
    }

    #[test]
    fn first_match_wins() {
        struct Always(&'static str);

        impl Serializer for Always {
            fn matches(&self, _decl: &TypeDecl) -> bool {
                true
            }

            fn serialize(&self, _value: &dyn Reflect) -> Result<Primitive, BindError> {
                Ok(Primitive::from(self.0))
            }

            fn unserialize_value(
                &self,
                _data: &Primitive,
                _decl: &TypeDecl,
            ) -> Result<Box<dyn Reflect>, BindError> {
                Ok(Box::new(String::from(self.0)))
            }
        }

        let resolver = ResolverBuilder::new()
            .with(Arc::new(Always("first")))
            .with(Arc::new(Always("second")))
            .build();

        let table = TypeTable::new();
        let decl = TypeDecl::from_name("anything", &table);
        let found = resolver.resolve(&decl).unwrap();
        assert_eq!(found.serialize(&0_i64).unwrap(), Primitive::from("first"));
    }

    #[test]
    fn no_match_is_no_serializer_found() {
        let resolver = ResolverBuilder::new().with(Arc::new(Fixed("i64"))).build();

        let table = TypeTable::new();
        let decl = TypeDecl::from_name("bool", &table);
        assert!(matches!(
            resolver.resolve(&decl).unwrap_err(),
            BindError::NoSerializerFound { .. }
        ));
    }

    #[test]
    fn resolver_ref_lifecycle() {
        let handle = ResolverRef::new();
        assert!(matches!(
            handle.get().unwrap_err(),
            BindError::ResolverDetached
        ));

        let resolver = ResolverBuilder::new().build();
        handle.attach(&resolver);
        assert!(handle.get().is_ok());

        drop(resolver);
        assert!(matches!(
            handle.get().unwrap_err(),
            BindError::ResolverDetached
        ));
    }
}

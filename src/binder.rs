use std::sync::Arc;

use crate::error::BindError;
use crate::info::{TypeDecl, TypePath};
use crate::primitive::Primitive;
use crate::reflection::Reflect;
use crate::registry::{
    DependencyResolver, MapMeta, ResolverAware, ResolverBuilder, StructMeta, TypeTable,
};
use crate::serializer::{
    MapSerializer, ScalarBind, ScalarSerializer, Serializer, StructSerializer,
};

// -----------------------------------------------------------------------------
// Binder

/// The assembled engine: a frozen type table plus a wired serializer
/// registry.
///
/// Built once through [`Binder::builder`], read-only afterwards; a `Binder`
/// is `Send + Sync` and can be shared freely behind an `Arc`.
///
/// # Examples
///
/// ```
/// use databind::Binder;
/// use databind::derive::Reflect;
///
/// #[derive(Reflect, Default, PartialEq, Debug)]
/// struct Person {
///     name: String,
///     age: i64,
///     nickname: Option<String>,
/// }
///
/// let binder = Binder::builder().register::<Person>().build();
///
/// let person = Person {
///     name: "Alice".into(),
///     age: 34,
///     nickname: None,
/// };
/// let data = binder.serialize(&person).unwrap();
/// let back: Person = binder.unserialize_as(&data).unwrap();
/// assert_eq!(back, person);
/// ```
pub struct Binder {
    table: Arc<TypeTable>,
    resolver: Arc<DependencyResolver>,
}

impl Binder {
    /// Starts building a binder.
    pub fn builder() -> BinderBuilder {
        BinderBuilder::new()
    }

    /// Converts a runtime value into a primitive tree.
    ///
    /// The declaration is inferred from the value; resolution picks the
    /// serializer.
    pub fn serialize(&self, value: &dyn Reflect) -> Result<Primitive, BindError> {
        let decl = TypeDecl::from_value(value);
        self.resolver.resolve(&decl)?.serialize(value)
    }

    /// Converts primitive data into a value of the declared type.
    ///
    /// `Ok(None)` means the declaration was nullable and the data null.
    pub fn unserialize(
        &self,
        data: &Primitive,
        decl: &TypeDecl,
    ) -> Result<Option<Box<dyn Reflect>>, BindError> {
        self.resolver.resolve(decl)?.unserialize(data, decl)
    }

    /// Converts primitive data into a concrete `T`.
    ///
    /// The declaration is `T`'s own, non-nullable; null data is
    /// [`BindError::NullValue`].
    pub fn unserialize_as<T: Reflect + TypePath>(&self, data: &Primitive) -> Result<T, BindError> {
        let decl = self.decl_of::<T>();
        let value = self
            .unserialize(data, &decl)?
            .ok_or_else(|| BindError::null_value(&decl, "value"))?;
        value
            .take::<T>()
            .map_err(|found| BindError::mismatched(T::type_path(), found.reflect_type_path()))
    }

    /// The declaration for the statically known type `T`.
    #[inline]
    pub fn decl_of<T: TypePath>(&self) -> TypeDecl {
        TypeDecl::of::<T>(&self.table)
    }

    /// Parses a declaration from its textual form against this binder's
    /// table.
    #[inline]
    pub fn decl(&self, text: &str) -> TypeDecl {
        TypeDecl::from_name(text, &self.table)
    }

    /// The type table the serializers consult.
    #[inline]
    pub fn table(&self) -> &Arc<TypeTable> {
        &self.table
    }

    /// The serializer registry.
    #[inline]
    pub fn resolver(&self) -> &Arc<DependencyResolver> {
        &self.resolver
    }
}

// -----------------------------------------------------------------------------
// BinderBuilder

/// Collects type registrations and serializer overrides, then performs the
/// two-phase resolver construction.
///
/// Default serializer precedence, later entries only seen by declarations the
/// earlier ones rejected:
///
/// 1. user serializers, in registration order
/// 2. one [`ScalarSerializer`] per supported scalar type
/// 3. the [`MapSerializer`]
/// 4. the [`StructSerializer`] (the catch-all, always last)
pub struct BinderBuilder {
    table: TypeTable,
    skip_null: bool,
    extra: Vec<BuilderEntry>,
}

enum BuilderEntry {
    Plain(Arc<dyn Serializer>),
    Aware {
        serializer: Arc<dyn Serializer>,
        aware: Arc<dyn ResolverAware>,
    },
}

impl BinderBuilder {
    /// Creates a builder with an empty type table.
    pub fn new() -> Self {
        Self {
            table: TypeTable::new(),
            skip_null: false,
            extra: Vec::new(),
        }
    }

    /// Creates a builder whose table already holds every registration
    /// collected through the derive macro's `auto_register` submission.
    #[cfg(feature = "auto_register")]
    pub fn with_registered() -> Self {
        let mut builder = Self::new();
        builder.table = TypeTable::with_registered();
        builder
    }

    /// Registers a struct type.
    pub fn register<T: StructMeta>(mut self) -> Self {
        self.table.register_struct::<T>();
        self
    }

    /// Registers a container type.
    pub fn register_map<T: MapMeta>(mut self) -> Self {
        self.table.register_map::<T>();
        self
    }

    /// Omits null fields from struct output instead of writing explicit
    /// `Null` entries.
    pub fn skip_null(mut self, skip_null: bool) -> Self {
        self.skip_null = skip_null;
        self
    }

    /// Adds a serializer ahead of the defaults.
    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.extra.push(BuilderEntry::Plain(serializer));
        self
    }

    /// Adds a resolver-aware serializer ahead of the defaults.
    pub fn with_aware_serializer<S>(mut self, serializer: Arc<S>) -> Self
    where
        S: Serializer + ResolverAware + 'static,
    {
        self.extra.push(BuilderEntry::Aware {
            serializer: serializer.clone(),
            aware: serializer,
        });
        self
    }

    /// Builds the binder, wiring the default serializers behind any user
    /// ones and attaching the resolver to every aware serializer.
    pub fn build(self) -> Binder {
        fn scalar<T: ScalarBind>() -> Arc<dyn Serializer> {
            Arc::new(ScalarSerializer::<T>::new())
        }

        let table = Arc::new(self.table);
        let mut resolver = ResolverBuilder::new();
        for entry in self.extra {
            resolver = match entry {
                BuilderEntry::Plain(serializer) => resolver.with(serializer),
                BuilderEntry::Aware { serializer, aware } => {
                    resolver.with_erased_aware(serializer, aware)
                }
            };
        }

        resolver = resolver
            .with(scalar::<bool>())
            .with(scalar::<i8>())
            .with(scalar::<i16>())
            .with(scalar::<i32>())
            .with(scalar::<i64>())
            .with(scalar::<u8>())
            .with(scalar::<u16>())
            .with(scalar::<u32>())
            .with(scalar::<u64>())
            .with(scalar::<f32>())
            .with(scalar::<f64>())
            .with(scalar::<char>())
            .with(scalar::<String>())
            .with_aware(Arc::new(MapSerializer::new(table.clone())))
            .with_aware(Arc::new(StructSerializer::new(
                table.clone(),
                self.skip_null,
            )));

        Binder {
            table,
            resolver: resolver.build(),
        }
    }
}

impl Default for BinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests

use std::sync::Arc;

use crate::error::BindError;
use crate::info::TypeDecl;
use crate::primitive::{Primitive, PrimitiveMap};
use crate::reflection::Reflect;
use crate::registry::{DependencyResolver, ResolverAware, ResolverRef, TypeTable};
use crate::serializer::Serializer;

// -----------------------------------------------------------------------------
// MapSerializer

/// The serializer for every registered container type.
///
/// Containers with strict element types (declared through
/// [`MapMeta`](crate::registry::MapMeta)) have their element serializers
/// resolved once per call; heterogeneous containers fall back to per-entry
/// inference, from the value when serializing and from the primitive node
/// when unserializing. Entry order is preserved in both directions.
///
/// Entries are concrete: a null key or value under an inferred declaration
/// resolves to nothing ([`BindError::NoSerializerFound`]), and under a
/// declared one it is rejected as [`BindError::NullValue`].
pub struct MapSerializer {
    table: Arc<TypeTable>,
    resolver: ResolverRef,
}

impl MapSerializer {
    /// Creates the serializer over the given type table.
    pub fn new(table: Arc<TypeTable>) -> Self {
        Self {
            table,
            resolver: ResolverRef::new(),
        }
    }

    fn serialize_entry(
        &self,
        resolver: &DependencyResolver,
        strict: Option<&(TypeDecl, Arc<dyn Serializer>)>,
        value: &dyn Reflect,
    ) -> Result<Primitive, BindError> {
        match strict {
            Some((_, serializer)) => serializer.serialize(value),
            None => resolver
                .resolve(&TypeDecl::from_value(value))?
                .serialize(value),
        }
    }

    fn unserialize_entry(
        &self,
        resolver: &DependencyResolver,
        strict: Option<&(TypeDecl, Arc<dyn Serializer>)>,
        data: &Primitive,
        context: &'static str,
    ) -> Result<Box<dyn Reflect>, BindError> {
        match strict {
            Some((decl, serializer)) => serializer
                .unserialize(data, decl)?
                .ok_or_else(|| BindError::null_value(decl, context)),
            None => {
                let decl = TypeDecl::from_primitive(data);
                resolver
                    .resolve(&decl)?
                    .unserialize(data, &decl)?
                    .ok_or_else(|| BindError::null_value(&decl, context))
            }
        }
    }

    /// Resolves a strict element serializer up front, if the declaration
    /// carries one.
    fn strict_pair(
        &self,
        resolver: &DependencyResolver,
        element: Option<&TypeDecl>,
    ) -> Result<Option<(TypeDecl, Arc<dyn Serializer>)>, BindError> {
        element
            .map(|decl| Ok((decl.clone(), resolver.resolve(decl)?)))
            .transpose()
    }
}

impl ResolverAware for MapSerializer {
    fn attach(&self, resolver: &Arc<DependencyResolver>) {
        self.resolver.attach(resolver);
    }
}

impl Serializer for MapSerializer {
    fn matches(&self, decl: &TypeDecl) -> bool {
        self.table.map_record(&decl.name).is_some()
    }

    fn serialize(&self, value: &dyn Reflect) -> Result<Primitive, BindError> {
        let map = value
            .reflect_ref()
            .as_map()
            .ok_or_else(|| BindError::mismatched("map", value.reflect_type_path()))?;

        let resolver = self.resolver.get()?;
        let decl = TypeDecl::from_name(value.reflect_type_path(), &self.table);
        let strict_key = self.strict_pair(&resolver, decl.key.as_deref())?;
        let strict_value = self.strict_pair(&resolver, decl.value.as_deref())?;

        let mut out = PrimitiveMap::with_capacity(map.len());
        for (key, entry) in map.entries() {
            out.insert(
                self.serialize_entry(&resolver, strict_key.as_ref(), key)?,
                self.serialize_entry(&resolver, strict_value.as_ref(), entry)?,
            );
        }
        Ok(Primitive::Map(out))
    }

    fn unserialize_value(
        &self,
        data: &Primitive,
        decl: &TypeDecl,
    ) -> Result<Box<dyn Reflect>, BindError> {
        let map_data = data
            .as_map()
            .ok_or_else(|| BindError::invalid_data(decl, data))?;
        let record = self
            .table
            .map_record(&decl.name)
            .ok_or_else(|| BindError::no_serializer(decl))?;

        let resolver = self.resolver.get()?;
        let strict_key = self.strict_pair(&resolver, decl.key.as_deref())?;
        let strict_value = self.strict_pair(&resolver, decl.value.as_deref())?;

        let mut builder = record.builder();
        for (key, entry) in map_data.iter() {
            builder.add(
                self.unserialize_entry(&resolver, strict_key.as_ref(), key, "container key")?,
                self.unserialize_entry(&resolver, strict_value.as_ref(), entry, "container value")?,
            )?;
        }
        Ok(builder.build())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{DynMap, Map};
    use crate::registry::ResolverBuilder;
    use crate::serializer::ScalarSerializer;

    fn setup() -> (Arc<TypeTable>, Arc<DependencyResolver>) {
        let table = Arc::new(TypeTable::new());
        let map_serializer = Arc::new(MapSerializer::new(table.clone()));
        let resolver = ResolverBuilder::new()
            .with(Arc::new(ScalarSerializer::<i64>::new()))
            .with(Arc::new(ScalarSerializer::<String>::new()))
            .with(Arc::new(ScalarSerializer::<bool>::new()))
            .with_aware(map_serializer)
            .build();
        (table, resolver)
    }

    #[test]
    fn heterogeneous_round_trip() {
        let (table, resolver) = setup();

        let mut map = DynMap::new();
        map.push(String::from("id"), 7_i64);
        map.push(1_i64, true);

        let decl = TypeDecl::of::<DynMap>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = serializer.serialize(&map).unwrap();
        let tree = data.as_map().unwrap();
        assert_eq!(tree.get_str("id"), Some(&Primitive::Int(7)));
        assert_eq!(tree.get(&Primitive::Int(1)), Some(&Primitive::Bool(true)));

        let back = serializer.unserialize_value(&data, &decl).unwrap();
        let back = back.downcast_ref::<DynMap>().unwrap();
        assert_eq!(back.len(), 2);

        let (first_key, first_value) = back.entries().next().unwrap();
        assert_eq!(first_key.downcast_ref::<String>().unwrap(), "id");
        assert_eq!(first_value.downcast_ref::<i64>(), Some(&7));
    }

    #[test]
    fn strict_container_round_trip() {
        use crate::impls::OrderedMap;

        let mut table = TypeTable::new();
        table.register_map::<OrderedMap<String, i64>>();
        let table = Arc::new(table);

        let resolver = ResolverBuilder::new()
            .with(Arc::new(ScalarSerializer::<i64>::new()))
            .with(Arc::new(ScalarSerializer::<String>::new()))
            .with_aware(Arc::new(MapSerializer::new(table.clone())))
            .build();

        let map: OrderedMap<String, i64> =
            [(String::from("b"), 2), (String::from("a"), 1)].into_iter().collect();
        let decl = TypeDecl::of::<OrderedMap<String, i64>>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = serializer.serialize(&map).unwrap();
        let keys: Vec<_> = data
            .as_map()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(keys, [Primitive::from("b"), Primitive::from("a")]);

        let back = serializer.unserialize_value(&data, &decl).unwrap();
        let back = back.downcast_ref::<OrderedMap<String, i64>>().unwrap();
        assert_eq!(back.get(&String::from("a")), Some(&1));
        assert_eq!(back.get(&String::from("b")), Some(&2));
    }

    #[test]
    fn strict_element_mismatch_is_invalid_data() {
        use crate::impls::OrderedMap;

        let mut table = TypeTable::new();
        table.register_map::<OrderedMap<String, i64>>();
        let table = Arc::new(table);

        let resolver = ResolverBuilder::new()
            .with(Arc::new(ScalarSerializer::<i64>::new()))
            .with(Arc::new(ScalarSerializer::<String>::new()))
            .with_aware(Arc::new(MapSerializer::new(table.clone())))
            .build();

        let decl = TypeDecl::of::<OrderedMap<String, i64>>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = Primitive::Map(PrimitiveMap::from_iter([(
            Primitive::from("a"),
            Primitive::from("not an int"),
        )]));
        assert!(matches!(
            serializer.unserialize_value(&data, &decl).unwrap_err(),
            BindError::InvalidData { .. }
        ));
    }

    #[test]
    fn scalar_data_is_invalid() {
        let (table, resolver) = setup();
        let decl = TypeDecl::of::<DynMap>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        assert!(matches!(
            serializer
                .unserialize_value(&Primitive::Int(3), &decl)
                .unwrap_err(),
            BindError::InvalidData { .. }
        ));
    }

    #[test]
    fn null_entry_under_inference_has_no_serializer() {
        let (table, resolver) = setup();
        let decl = TypeDecl::of::<DynMap>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = Primitive::Map(PrimitiveMap::from_iter([(
            Primitive::from("a"),
            Primitive::Null,
        )]));
        assert!(matches!(
            serializer.unserialize_value(&data, &decl).unwrap_err(),
            BindError::NoSerializerFound { .. }
        ));
    }

    #[test]
    fn detached_resolver_is_reported() {
        let table = Arc::new(TypeTable::new());
        let serializer = MapSerializer::new(table.clone());
        let map = DynMap::new();

        assert!(matches!(
            serializer.serialize(&map).unwrap_err(),
            BindError::ResolverDetached
        ));
    }
}

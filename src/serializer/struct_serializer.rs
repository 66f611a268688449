use std::sync::Arc;

use crate::error::BindError;
use crate::info::TypeDecl;
use crate::primitive::{Primitive, PrimitiveMap};
use crate::reflection::Reflect;
use crate::registry::{DependencyResolver, ResolverAware, ResolverRef, TypeTable};
use crate::serializer::Serializer;

// -----------------------------------------------------------------------------
// StructSerializer

/// The catch-all serializer for every registered struct type.
///
/// Ordered last in the default precedence: anything that names a registered
/// struct and survived the scalar and container predicates lands here.
///
/// Serialize walks the fields in declaration order; a null (`Option::None`)
/// field emits an explicit `Null` entry unless `skip_null` is set. Field
/// visibility is irrelevant, the derive reflects private fields too.
///
/// Unserialize starts from the registered blank instance and fills it field
/// by field. A missing key and an explicit null are equivalent: accepted for
/// nullable fields, [`BindError::NullValue`] otherwise.
pub struct StructSerializer {
    table: Arc<TypeTable>,
    skip_null: bool,
    resolver: ResolverRef,
}

impl StructSerializer {
    /// Creates the serializer over the given type table.
    ///
    /// With `skip_null` set, null fields are omitted from serialized output
    /// instead of appearing as explicit `Null` entries.
    pub fn new(table: Arc<TypeTable>, skip_null: bool) -> Self {
        Self {
            table,
            skip_null,
            resolver: ResolverRef::new(),
        }
    }
}

impl ResolverAware for StructSerializer {
    fn attach(&self, resolver: &Arc<DependencyResolver>) {
        self.resolver.attach(resolver);
    }
}

impl Serializer for StructSerializer {
    fn matches(&self, decl: &TypeDecl) -> bool {
        self.table.struct_record(&decl.name).is_some()
    }

    fn serialize(&self, value: &dyn Reflect) -> Result<Primitive, BindError> {
        let composite = value
            .reflect_ref()
            .as_struct()
            .ok_or_else(|| BindError::mismatched("struct", value.reflect_type_path()))?;

        let resolver = self.resolver.get()?;
        let mut out = PrimitiveMap::with_capacity(composite.field_len());
        for index in 0..composite.field_len() {
            let Some(name) = composite.name_at(index) else {
                continue;
            };
            match composite.field_at(index) {
                Some(field) => {
                    let serializer = resolver.resolve(&TypeDecl::from_value(field))?;
                    out.insert(Primitive::from(name), serializer.serialize(field)?);
                }
                None if self.skip_null => {}
                None => {
                    out.insert(Primitive::from(name), Primitive::Null);
                }
            }
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
            .struct_record(&decl.name)
            .ok_or_else(|| BindError::no_serializer(decl))?;

        let resolver = self.resolver.get()?;
        let mut instance = record.blank();
        let composite = instance
            .reflect_mut()
            .as_struct()
            .ok_or_else(|| BindError::mismatched("struct", decl.name.clone()))?;

        for field in record.info().fields() {
            let field_decl = self.table.detect(field);
            match map_data.get_str(field.name()) {
                None | Some(Primitive::Null) => {
                    if field_decl.nullable {
                        continue;
                    }
                    return Err(BindError::null_value(
                        &field_decl,
                        format!("field `{}` of `{}`", field.name(), decl.name),
                    ));
                }
                Some(entry) => {
                    let serializer = resolver.resolve(&field_decl)?;
                    if let Some(value) = serializer.unserialize(entry, &field_decl)? {
                        composite.set_field(field.name(), value)?;
                    }
                }
            }
        }
        Ok(instance)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::OnceLock;

    use super::*;
    use crate::info::{FieldInfo, StructInfo, TypePath};
    use crate::ops::{Struct, take_field};
    use crate::reflection::{ReflectKind, ReflectMut, ReflectRef};
    use crate::registry::{ResolverBuilder, StructMeta};
    use crate::serializer::ScalarSerializer;

    #[derive(Default, PartialEq, Debug)]
    struct Point {
        x: i64,
        label: Option<String>,
    }

    impl TypePath for Point {
        fn type_path() -> &'static str {
            "tests::Point"
        }

        fn type_name() -> &'static str {
            "Point"
        }
    }

    impl Reflect for Point {
        fn reflect_kind(&self) -> ReflectKind {
            ReflectKind::Struct
        }

        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Struct(self)
        }

        fn reflect_mut(&mut self) -> ReflectMut<'_> {
            ReflectMut::Struct(self)
        }

        fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{self:?}")
        }
    }

    impl Struct for Point {
        fn field(&self, name: &str) -> Option<&dyn Reflect> {
            match name {
                "x" => Some(&self.x),
                "label" => self.label.as_ref().map(|value| value as &dyn Reflect),
                _ => None,
            }
        }

        fn field_at(&self, index: usize) -> Option<&dyn Reflect> {
            self.name_at(index).and_then(|name| self.field(name))
        }

        fn name_at(&self, index: usize) -> Option<&'static str> {
            ["x", "label"].get(index).copied()
        }

        fn field_len(&self) -> usize {
            2
        }

        fn set_field(&mut self, name: &str, value: Box<dyn Reflect>) -> Result<(), BindError> {
            match name {
                "x" => self.x = take_field(value)?,
                "label" => self.label = Some(take_field(value)?),
                _ => return Err(BindError::unknown_field(Self::type_path(), name.to_owned())),
            }
            Ok(())
        }
    }

    impl StructMeta for Point {
        fn struct_info() -> &'static StructInfo {
            static INFO: OnceLock<StructInfo> = OnceLock::new();
            INFO.get_or_init(|| {
                StructInfo::new::<Point>(vec![
                    FieldInfo::new::<i64>("x", false),
                    FieldInfo::new::<String>("label", true),
                ])
            })
        }

        fn blank() -> Self {
            Self::default()
        }
    }

    fn setup(skip_null: bool) -> (Arc<TypeTable>, Arc<DependencyResolver>) {
        let mut table = TypeTable::new();
        table.register_struct::<Point>();
        let table = Arc::new(table);

        let resolver = ResolverBuilder::new()
            .with(Arc::new(ScalarSerializer::<i64>::new()))
            .with(Arc::new(ScalarSerializer::<String>::new()))
            .with_aware(Arc::new(StructSerializer::new(table.clone(), skip_null)))
            .build();
        (table, resolver)
    }

    #[test]
    fn null_fields_serialize_explicitly_by_default() {
        let (table, resolver) = setup(false);
        let decl = TypeDecl::of::<Point>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = serializer
            .serialize(&Point { x: 3, label: None })
            .unwrap();
        let tree = data.as_map().unwrap();
        assert_eq!(tree.get_str("x"), Some(&Primitive::Int(3)));
        assert_eq!(tree.get_str("label"), Some(&Primitive::Null));
    }

    #[test]
    fn skip_null_omits_the_entry() {
        let (table, resolver) = setup(true);
        let decl = TypeDecl::of::<Point>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = serializer
            .serialize(&Point { x: 3, label: None })
            .unwrap();
        assert!(!data.as_map().unwrap().contains_str("label"));
    }

    #[test]
    fn round_trip_with_nullable_field() {
        let (table, resolver) = setup(false);
        let decl = TypeDecl::of::<Point>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let original = Point {
            x: -4,
            label: Some(String::from("origin")),
        };
        let data = serializer.serialize(&original).unwrap();
        let back = serializer.unserialize_value(&data, &decl).unwrap();
        assert_eq!(back.take::<Point>().unwrap(), original);
    }

    #[test]
    fn missing_required_field_is_null_value() {
        let (table, resolver) = setup(false);
        let decl = TypeDecl::of::<Point>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = Primitive::Map(PrimitiveMap::from_iter([(
            Primitive::from("label"),
            Primitive::from("no x"),
        )]));
        assert!(matches!(
            serializer.unserialize_value(&data, &decl).unwrap_err(),
            BindError::NullValue { .. }
        ));
    }

    #[test]
    fn explicit_null_required_field_is_null_value() {
        let (table, resolver) = setup(false);
        let decl = TypeDecl::of::<Point>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = Primitive::Map(PrimitiveMap::from_iter([
            (Primitive::from("x"), Primitive::Null),
            (Primitive::from("label"), Primitive::from("tag")),
        ]));
        assert!(matches!(
            serializer.unserialize_value(&data, &decl).unwrap_err(),
            BindError::NullValue { .. }
        ));
    }

    #[test]
    fn missing_nullable_field_stays_null() {
        let (table, resolver) = setup(false);
        let decl = TypeDecl::of::<Point>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        let data = Primitive::Map(PrimitiveMap::from_iter([(
            Primitive::from("x"),
            Primitive::Int(9),
        )]));
        let back = serializer.unserialize_value(&data, &decl).unwrap();
        assert_eq!(back.take::<Point>().unwrap(), Point { x: 9, label: None });
    }

    #[test]
    fn scalar_data_is_invalid() {
        let (table, resolver) = setup(false);
        let decl = TypeDecl::of::<Point>(&table);
        let serializer = resolver.resolve(&decl).unwrap();

        assert!(matches!(
            serializer
                .unserialize_value(&Primitive::from("not a map"), &decl)
                .unwrap_err(),
            BindError::InvalidData { .. }
        ));
    }
}

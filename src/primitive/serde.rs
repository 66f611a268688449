//! Serde data-model bridge for the primitive tree.
//!
//! The tree itself has no canonical encoding; these impls let callers pick a
//! serde backend. Sequences are rejected on the way in, because the tree has
//! no list form.

use std::fmt;

use serde_core::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, Serializer};

use super::{Primitive, PrimitiveMap};

impl Serialize for Primitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Primitive::Null => serializer.serialize_unit(),
            Primitive::Bool(value) => serializer.serialize_bool(*value),
            Primitive::Int(value) => serializer.serialize_i64(*value),
            Primitive::Float(value) => serializer.serialize_f64(*value),
            Primitive::Str(value) => serializer.serialize_str(value),
            Primitive::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for PrimitiveMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct PrimitiveVisitor;

impl<'de> Visitor<'de> for PrimitiveVisitor {
    type Value = Primitive;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, null, or mapping")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Primitive, E> {
        Ok(Primitive::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Primitive, E> {
        Ok(Primitive::Int(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Primitive, E> {
        i64::try_from(value)
            .map(Primitive::Int)
            .map_err(|_| E::custom("integer out of range for the primitive tree"))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Primitive, E> {
        Ok(Primitive::Float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Primitive, E> {
        Ok(Primitive::Str(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Primitive, E> {
        Ok(Primitive::Str(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Primitive, E> {
        Ok(Primitive::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Primitive, E> {
        Ok(Primitive::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Primitive, D::Error> {
        Primitive::deserialize(deserializer)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Primitive, A::Error> {
        let mut map = PrimitiveMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<Primitive, Primitive>()? {
            map.insert(key, value);
        }
        Ok(Primitive::Map(map))
    }
}

impl<'de> Deserialize<'de> for Primitive {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PrimitiveVisitor)
    }
}

// -----------------------------------------------------------------------------
// Tests

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entry::MajorType;
use crate::scalar::{Scalar, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED};
use crate::value::ValueRef;
use crate::Document;

/// Serializes the data model a self-describing format can carry.
///
/// Tags are transparent (only the wrapped value is serialized), `null` and `undefined` become
/// unit, and other simple values serialize as their `u8` code.
impl Serialize for ValueRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.major() {
            MajorType::Unsigned => serializer.serialize_u64(self.raw_int()),
            MajorType::Negative => {
                let n = -1 - i128::from(self.raw_int());
                match i64::try_from(n) {
                    Ok(v) => serializer.serialize_i64(v),
                    Err(_) => serializer.serialize_i128(n),
                }
            }
            MajorType::Bytes => serializer.serialize_bytes(self.string_bytes()),
            MajorType::Text => match self.as_text() {
                Some(s) => serializer.serialize_str(s),
                None => Err(serde::ser::Error::custom("text must be valid UTF-8")),
            },
            MajorType::Array => {
                let items = self.items();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(&item)?;
                }
                seq.end()
            }
            MajorType::Map => {
                let items = self.items();
                let mut m = serializer.serialize_map(Some(items.len() / 2))?;
                let mut it = items.iter();
                while let (Some(k), Some(v)) = (it.next(), it.next()) {
                    m.serialize_entry(&k, &v)?;
                }
                m.end()
            }
            MajorType::Tag => self.tag_ref().value().serialize(serializer),
            MajorType::FloatOrSimple => match self.scalar() {
                Scalar::Float(f) => serializer.serialize_f64(f),
                Scalar::Simple(SIMPLE_FALSE) => serializer.serialize_bool(false),
                Scalar::Simple(SIMPLE_TRUE) => serializer.serialize_bool(true),
                Scalar::Simple(SIMPLE_NULL | SIMPLE_UNDEFINED) => serializer.serialize_unit(),
                Scalar::Simple(code) => serializer.serialize_u8(code),
            },
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

/// Builds a document from any self-describing format, e.g. JSON text.
impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

fn built<E: serde::de::Error>(r: Result<Document, crate::CborError>) -> Result<Document, E> {
    r.map_err(E::custom)
}

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a CBOR-representable value")
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
        built(Document::build(|b| b.bool(v)))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        built(Document::build(|b| b.int(v)))
    }

    fn visit_i128<E: serde::de::Error>(self, v: i128) -> Result<Self::Value, E> {
        if let Ok(u) = u64::try_from(v) {
            return self.visit_u64(u);
        }
        let raw = u64::try_from(-1 - v).map_err(|_| E::custom("integer out of CBOR range"))?;
        built(Document::build(|b| b.negative(raw)))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        built(Document::build(|b| b.uint(v)))
    }

    fn visit_u128<E: serde::de::Error>(self, v: u128) -> Result<Self::Value, E> {
        let v = u64::try_from(v).map_err(|_| E::custom("integer out of CBOR range"))?;
        self.visit_u64(v)
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
        built(Document::build(|b| b.float(v)))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        built(Document::build(|b| b.text(v)))
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
        self.visit_str(&v)
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        built(Document::build(|b| b.bytes(v)))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        built(Document::build(|b| b.null()))
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        self.visit_unit()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items: Vec<Document> = Vec::new();
        while let Some(item) = seq.next_element::<Document>()? {
            items.push(item);
        }
        built(Document::build(|b| {
            b.array(|a| items.iter().try_for_each(|item| a.value(item.root())))
        }))
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let mut pairs: Vec<(Document, Document)> = Vec::new();
        while let Some(pair) = map.next_entry::<Document, Document>()? {
            pairs.push(pair);
        }
        built(Document::build(|b| {
            b.map(|m| {
                pairs.iter().try_for_each(|(k, v)| {
                    m.value(k.root())?;
                    m.value(v.root())
                })
            })
        }))
    }
}

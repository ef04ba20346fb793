use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, de};
use serde::{Serialize, Serializer};

use crate::PacSid;

impl Serialize for PacSid {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

struct PacSidVisitor;

impl de::Visitor<'_> for PacSidVisitor {
    type Value = PacSid;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a Windows SID as a string (e.g., \"S-1-...\") or as raw PAC binary")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        PacSid::from_str(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        PacSid::from_bytes(v).map_err(|_| E::invalid_value(de::Unexpected::Bytes(v), &self))
    }
}

impl<'de> Deserialize<'de> for PacSid {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(PacSidVisitor)
        } else {
            deserializer.deserialize_bytes(PacSidVisitor)
        }
    }
}

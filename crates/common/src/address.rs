//! Management resource addresses

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Ordered `(key, value)` segments identifying a resource in the management
/// model, e.g. `/subsystem=batch-jberet/thread-pool=default`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    segments: Vec<(String, String)>,
}

impl Address {
    /// The root resource
    pub fn root() -> Self {
        Self::default()
    }

    pub fn of(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::root().and(key, value)
    }

    pub fn subsystem(name: impl Into<String>) -> Self {
        Self::of("subsystem", name)
    }

    /// Returns a new address with one more segment
    pub fn and(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push((key.into(), value.into()));
        Self { segments }
    }

    /// Parent address, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_key(&self) -> Option<&str> {
        self.segments.last().map(|(k, _)| k.as_str())
    }

    pub fn last_value(&self) -> Option<&str> {
        self.segments.last().map(|(_, v)| v.as_str())
    }

    pub fn segments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.segments.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for (key, value) in &self.segments {
            write!(f, "/{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Serializes as the management JSON form `[{"key": "value"}, ...]`.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.segments.len()))?;
        for segment in &self.segments {
            seq.serialize_element(&Segment(segment))?;
        }
        seq.end()
    }
}

struct Segment<'a>(&'a (String, String));

impl Serialize for Segment<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0 .0, &self.0 .1)?;
        map.end()
    }
}

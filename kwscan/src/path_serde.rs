//! Serde codecs that carry file paths without loss.
//!
//! A path that is valid UTF-8 is written as a plain string. Any other path is written as its raw
//! bytes, which serde_json renders as an array of numbers. Both forms are accepted on the way in,
//! so every file name the OS hands out survives the trip to an isolated worker and back.
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(unix)]
fn raw_bytes(path: &Path) -> Option<&[u8]> {
    use std::os::unix::ffi::OsStrExt;
    Some(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn raw_bytes(_path: &Path) -> Option<&[u8]> {
    None
}

#[cfg(unix)]
fn from_raw_bytes<E: de::Error>(bytes: Vec<u8>) -> Result<PathBuf, E> {
    use std::os::unix::ffi::OsStringExt;
    Ok(PathBuf::from(std::ffi::OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn from_raw_bytes<E: de::Error>(bytes: Vec<u8>) -> Result<PathBuf, E> {
    String::from_utf8(bytes).map(PathBuf::from).map_err(E::custom)
}

struct PathRef<'a>(&'a Path);

impl Serialize for PathRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(text) = self.0.to_str() {
            return serializer.serialize_str(text);
        }
        match raw_bytes(self.0) {
            Some(bytes) => serializer.serialize_bytes(bytes),
            None => Err(ser::Error::custom(format!(
                "path is not valid unicode: {}",
                self.0.display()
            ))),
        }
    }
}

struct PathList<'a>(&'a [PathBuf]);

impl Serialize for PathList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|p| PathRef(p)))
    }
}

struct OwnedPath(PathBuf);

struct OwnedPathVisitor;

impl<'de> Visitor<'de> for OwnedPathVisitor {
    type Value = PathBuf;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a path string or the raw bytes of a path")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PathBuf, E> {
        Ok(PathBuf::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<PathBuf, E> {
        Ok(PathBuf::from(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<PathBuf, E> {
        from_raw_bytes(v.to_vec())
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<PathBuf, E> {
        from_raw_bytes(v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PathBuf, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        from_raw_bytes(bytes)
    }
}

impl<'de> Deserialize<'de> for OwnedPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OwnedPathVisitor).map(OwnedPath)
    }
}

/// `Vec<PathBuf>` fields
pub(crate) mod list {
    use super::*;

    pub fn serialize<S>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        PathList(paths).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let paths = Vec::<OwnedPath>::deserialize(deserializer)?;
        Ok(paths.into_iter().map(|p| p.0).collect())
    }
}

/// Keyword to file list maps
pub(crate) mod keyword_map {
    use super::*;

    pub fn serialize<S>(
        map: &BTreeMap<String, Vec<PathBuf>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(map.iter().map(|(k, v)| (k, PathList(v))))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<PathBuf>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = BTreeMap::<String, Vec<OwnedPath>>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().map(|p| p.0).collect()))
            .collect())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of a top-level storage container.
///
/// A `BucketRef` is never empty. Whether it came from a call site or from a
/// configured default is irrelevant once constructed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketRef(String);

impl BucketRef {
    /// Build a bucket reference, rejecting empty names.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::MissingBucket);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BucketRef {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BucketRef> for String {
    fn from(bucket: BucketRef) -> Self {
        bucket.0
    }
}

impl AsRef<str> for BucketRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for BucketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BucketRef({})", self.0)
    }
}

/// Name of a blob within a bucket, e.g. `data/items.json`.
///
/// Keys are opaque to the store; `/` only matters when a local file name has
/// to be derived from the key (see [`ObjectKey::base_name`]).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build an object key, rejecting empty names.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        if key.is_empty() {
            return Err(TypeError::MissingKey);
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final `/`-separated segment of the key.
    ///
    /// `data/items.json` yields `items.json`; a key with no separator is its
    /// own base name. A key ending in `/` has an empty base name.
    pub fn base_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The base name, checked for use as a local file name.
    pub fn file_name(&self) -> Result<&str, TypeError> {
        let base = self.base_name();
        let reason = match base {
            "" => "key has no base name",
            "." | ".." => "base name is a relative path component",
            _ if base.contains('\\') || base.contains('\0') => {
                "base name contains a path separator or NUL"
            }
            _ => return Ok(base),
        };
        Err(TypeError::InvalidKey {
            key: self.0.clone(),
            reason: reason.to_string(),
        })
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ObjectKey {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_bucket_is_rejected() {
        assert_eq!(BucketRef::new(""), Err(TypeError::MissingBucket));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert_eq!(ObjectKey::new(""), Err(TypeError::MissingKey));
    }

    #[test]
    fn base_name_of_nested_key() {
        let key = ObjectKey::new("data/2024/items.json").unwrap();
        assert_eq!(key.base_name(), "items.json");
        assert_eq!(key.file_name().unwrap(), "items.json");
    }

    #[test]
    fn base_name_of_flat_key() {
        let key = ObjectKey::new("report.txt").unwrap();
        assert_eq!(key.base_name(), "report.txt");
    }

    #[test]
    fn trailing_slash_has_no_file_name() {
        let key = ObjectKey::new("data/").unwrap();
        assert_eq!(key.base_name(), "");
        assert!(matches!(key.file_name(), Err(TypeError::InvalidKey { .. })));
    }

    #[test]
    fn dot_components_are_not_file_names() {
        for raw in ["..", "a/..", "a/."] {
            let key = ObjectKey::new(raw).unwrap();
            assert!(key.file_name().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn display_is_raw_name() {
        let bucket = BucketRef::new("my-bucket").unwrap();
        assert_eq!(bucket.to_string(), "my-bucket");
        assert_eq!(format!("{bucket:?}"), "BucketRef(my-bucket)");
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let bucket: BucketRef = serde_json::from_str("\"b1\"").unwrap();
        assert_eq!(bucket.as_str(), "b1");
        assert!(serde_json::from_str::<BucketRef>("\"\"").is_err());
        assert!(serde_json::from_str::<ObjectKey>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn base_name_never_contains_slash(key in "[a-z/]{1,24}") {
            let key = ObjectKey::new(key).unwrap();
            prop_assert!(!key.base_name().contains('/'));
        }
    }
}

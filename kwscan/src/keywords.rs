use serde::{Deserialize, Serialize};

use crate::errors::{ScanError, ScanResult};

/// Ordered set of distinct keywords searched for during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Builds a keyword set, keeping the first occurrence of each keyword.
    ///
    /// Empty keywords are rejected since they would match every file.
    pub fn new<I, S>(keywords: I) -> ScanResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into();
            if keyword.is_empty() {
                return Err(ScanError::invalid_keyword("keywords must not be empty"));
            }
            if !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }
        Ok(Self { keywords: unique })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }
}

impl TryFrom<Vec<String>> for KeywordSet {
    type Error = ScanError;

    fn try_from(keywords: Vec<String>) -> ScanResult<Self> {
        Self::new(keywords)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_order_and_drops_duplicates() {
        let set = KeywordSet::new(["error", "test", "error", "keyword"]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["error", "test", "keyword"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_rejects_empty_keyword() {
        let result = KeywordSet::new(["error", ""]);
        assert!(matches!(result, Err(ScanError::InvalidKeyword(_))));
    }

    #[test]
    fn test_empty_set_is_allowed() {
        let set = KeywordSet::new(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_deserialize_validates() {
        let set: KeywordSet = serde_json::from_str(r#"["a","b","a"]"#).unwrap();
        assert_eq!(set.as_slice(), &["a".to_string(), "b".to_string()]);

        let bad: Result<KeywordSet, _> = serde_json::from_str(r#"["a",""]"#);
        assert!(bad.is_err());
    }
}

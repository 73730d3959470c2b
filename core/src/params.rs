//! Request parameters and their form encoding.

use url::form_urlencoded;

/// Insertion-ordered string parameters.
///
/// Encoded with `application/x-www-form-urlencoded` rules, both for query
/// strings and for request bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair. Setting a key twice keeps both pairs.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Chatwork takes flags as `1`/`0`.
    pub fn with_flag(self, key: impl Into<String>, value: bool) -> Self {
        self.with(key, if value { "1" } else { "0" })
    }

    /// Lists are sent comma-joined; an empty list is skipped.
    pub fn with_list<T: ToString>(self, key: impl Into<String>, values: &[T]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.with(key, joined)
    }

    pub fn with_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.with(key, v.to_string()),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `key=value&...`, or `None` when there is nothing to send.
    pub fn encode(&self) -> Option<String> {
        if self.pairs.is_empty() {
            return None;
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        Some(encoded)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_encode_to_none() {
        assert_eq!(Params::new().encode(), None);
    }

    #[test]
    fn values_are_form_encoded_in_insertion_order() {
        let params = Params::new()
            .with("body", "hello world & more")
            .with("self_unread", "0");
        assert_eq!(
            params.encode().as_deref(),
            Some("body=hello+world+%26+more&self_unread=0")
        );
    }

    #[test]
    fn flags_and_lists_follow_chatwork_conventions() {
        let params = Params::new()
            .with_flag("force", true)
            .with_list("members_admin_ids", &[1, 2, 3])
            .with_list("members_readonly_ids", &[] as &[u64])
            .with_opt("limit", None::<u64>);
        assert_eq!(params.get("force"), Some("1"));
        assert_eq!(params.get("members_admin_ids"), Some("1,2,3"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn non_ascii_is_percent_encoded() {
        let params: Params = [("name", "チャット")].into_iter().collect();
        assert_eq!(
            params.encode().as_deref(),
            Some("name=%E3%83%81%E3%83%A3%E3%83%83%E3%83%88")
        );
    }
}

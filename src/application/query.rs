//! Request target splitting and query-string decoding.

use memchr::memchr;
use std::borrow::Cow;

/// Splits a raw request target into its path and query.
///
/// The fragment is dropped. For absolute-form targets (`http://host/p?q`) only the path
/// component is returned as the path.
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    let target = memchr(b'#', target.as_bytes()).map_or(target, |idx| &target[..idx]);
    let (path, query) = match memchr(b'?', target.as_bytes()) {
        Some(idx) => (&target[..idx], Some(&target[idx + 1..])),
        None => (target, None),
    };

    (strip_origin(path), query)
}

fn strip_origin(path: &str) -> &str {
    if path.starts_with('/') || !path.contains("://") {
        return path;
    }

    let Ok(uri) = path.parse::<http::Uri>() else {
        return path;
    };
    let origin_len = uri.scheme_str().map_or(0, |s| s.len() + "://".len())
        + uri.authority().map_or(0, |a| a.as_str().len());

    path.get(origin_len..).unwrap_or(path)
}

/// Query parameters grouped by name, in order of first appearance. Repeated names keep all
/// their values in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Vec<String>)>);

impl QueryParams {
    /// Form-urlencoded decoding (`+` is a space); pairs with a blank value are skipped.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            params.push(key, value);
        }
        params
    }

    fn push(&mut self, key: Cow<'_, str>, value: Cow<'_, str>) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => self.0.push((key.into_owned(), vec![value.into_owned()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One `(key, value)` per value.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }
}

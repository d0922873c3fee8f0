//! URL-encoded form data.
//!
//! [`QueryDict`] holds the key/value pairs of a submitted
//! `application/x-www-form-urlencoded` body, in submission order. Keys may
//! repeat; [`get`](QueryDict::get) returns the last value.

/// Parsed form data.
///
/// # Examples
///
/// ```
/// use regform_forms::querydict::QueryDict;
///
/// let qd = QueryDict::parse("email=alice%40example.com&terms=on");
/// assert_eq!(qd.get("email"), Some("alice@example.com"));
/// assert!(qd.contains_key("terms"));
/// assert_eq!(qd.get("username"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    pairs: Vec<(String, String)>,
}

impl QueryDict {
    /// Creates an empty `QueryDict`.
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parses a URL-encoded string (e.g., `"key1=val1&key2=val2"`).
    ///
    /// `+` decodes to a space and percent sequences are decoded as UTF-8,
    /// lossily.
    pub fn parse(query_string: &str) -> Self {
        let pairs = query_string
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair
                    .find('=')
                    .map_or((pair, ""), |eq_pos| (&pair[..eq_pos], &pair[eq_pos + 1..]));
                (percent_decode(key), percent_decode(value))
            })
            .collect();
        Self { pairs }
    }

    /// Returns the last value for the given key, or `None` if not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Appends a value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns the number of key/value pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encodes the pairs back into a URL-encoded string.
    pub fn urlencode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}

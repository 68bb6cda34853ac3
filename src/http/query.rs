//! Query string parsing module
//!
//! Parses `application/x-www-form-urlencoded` query strings into a
//! multi-value map: `+` decodes to space, `%XX` escapes are percent-decoded,
//! repeated keys accumulate in request order.

use std::collections::HashMap;

/// Query/form values for one in-flight request
#[derive(Debug, Default, Clone)]
pub struct QueryMap {
    values: HashMap<String, Vec<String>>,
}

impl QueryMap {
    pub fn insert(&mut self, key: &str, value: String) {
        self.values.entry(key.to_string()).or_default().push(value);
    }

    /// All values supplied for `key`, in request order
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Values for `key` joined with a comma into one string
    ///
    /// This is the representation named-value binding uses: `["a","b"]`
    /// becomes `"a,b"`, an absent key stays `None`.
    pub fn joined(&self, key: &str) -> Option<String> {
        self.get(key).map(|values| values.join(","))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Parse a raw query string (without the leading `?`) into a [`QueryMap`]
pub fn parse_query(query: Option<&str>) -> QueryMap {
    let mut map = QueryMap::default();
    let Some(query) = query else {
        return map;
    };

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        map.insert(&key, decode_component(value));
    }
    map
}

/// Percent-decode one component; malformed escapes pass through literally
fn decode_component(component: &str) -> String {
    let bytes = component.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(high), Some(low)) => {
                        decoded.push(high * 16 + low);
                        i += 3;
                    }
                    _ => {
                        decoded.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

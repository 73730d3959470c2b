//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ApiRequest::build` produces an
//! `HttpRequest` without touching the network, a `Transport` turns it into
//! an `HttpResponse`, and `response::parse_response` interprets the result.
//! Keeping the wire step isolated lets every other stage be tested with
//! literal values.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether parameters travel in the query string rather than the body.
    ///
    /// Chatwork reads DELETE parameters from the query string, like GET.
    pub fn uses_query_string(self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value whose name matches `name` exactly.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// `headers` keeps the pairs in wire order, duplicates included; coalescing
/// happens in [`Headers::from_pairs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Split a raw response (header block followed by body) at `header_size`,
    /// the header length reported by the transport.
    ///
    /// A `header_size` past the end of `raw`, or one that does not fall on a
    /// character boundary, treats the whole input as headers.
    pub fn from_raw(status: u16, raw: &str, header_size: usize) -> Self {
        let (head, body) = match (raw.get(..header_size), raw.get(header_size..)) {
            (Some(head), Some(body)) => (head, body),
            _ => (raw, ""),
        };
        Self {
            status,
            headers: header_lines(head),
            body: body.to_string(),
        }
    }
}

/// Split a raw header block into `(name, value)` pairs.
///
/// Lines are trimmed; a line without `:` yields an empty value; nameless
/// lines and status lines (`HTTP/1.1 200 OK`) are skipped.
pub fn header_lines(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter(|line| !line.starts_with("HTTP/"))
        .filter_map(|line| {
            let (name, value) = line.split_once(':').unwrap_or((line, ""));
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Response headers with duplicate names coalesced.
///
/// Names compare case-sensitively. A repeated name has its values joined
/// with `", "` in first-seen order and keeps the first occurrence's casing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            let value = value.into();
            match entries.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                None => entries.push((name, value)),
            }
        }
        Self { entries }
    }

    /// Parse a raw header block and coalesce it.
    pub fn parse(raw: &str) -> Self {
        Self::from_pairs(header_lines(raw))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Lookup ignoring ASCII case. Used for vendor headers that HTTP stacks
    /// may have lowercased on the way in.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.get(name).or_else(|| {
            self.entries
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_header_values_are_joined_in_order() {
        let raw = concat!(
            "HTTP/1.1 200 OK\r\n",
            "Set-Cookie: a=1\r\n",
            "Content-Type: application/json\r\n",
            "Set-Cookie: b=2\r\n\r\n",
        );
        let headers = Headers::parse(raw);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Set-Cookie"), Some("a=1, b=2"));
        assert_eq!(headers.get("Content-Type"), Some("application/json"));
    }

    #[test]
    fn coalescing_is_case_sensitive_and_keeps_first_casing() {
        let headers = Headers::from_pairs([("Vary", "a"), ("vary", "b"), ("Vary", "c")]);
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Vary", "vary"]);
        assert_eq!(headers.get("Vary"), Some("a, c"));
        assert_eq!(headers.get("vary"), Some("b"));
    }

    #[test]
    fn get_ignore_case_prefers_exact_match() {
        let headers =
            Headers::from_pairs([("x-ratelimit-limit", "100"), ("X-RateLimit-Limit", "300")]);
        assert_eq!(headers.get_ignore_case("X-RateLimit-Limit"), Some("300"));
        let lower = Headers::from_pairs([("x-ratelimit-limit", "100")]);
        assert_eq!(lower.get_ignore_case("X-RateLimit-Limit"), Some("100"));
        assert_eq!(lower.get("X-RateLimit-Limit"), None);
    }

    #[test]
    fn header_lines_handles_missing_colon_and_whitespace() {
        let pairs = header_lines("  X-Flag  \r\nX-Value :  spaced out  \r\n: nameless\r\n");
        assert_eq!(
            pairs,
            vec![
                ("X-Flag".to_string(), String::new()),
                ("X-Value".to_string(), "spaced out".to_string()),
            ]
        );
    }

    #[test]
    fn header_values_may_contain_colons() {
        let headers = Headers::parse("Date: Tue, 15 Nov 1994 08:12:31 GMT\r\n");
        assert_eq!(headers.get("Date"), Some("Tue, 15 Nov 1994 08:12:31 GMT"));
    }

    #[test]
    fn from_raw_splits_at_header_size() {
        let head = "HTTP/1.1 200 OK\r\nX-RateLimit-Limit: 300\r\n\r\n";
        let raw = format!("{head}{{\"ok\":true}}");
        let response = HttpResponse::from_raw(200, &raw, head.len());
        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers,
            vec![("X-RateLimit-Limit".to_string(), "300".to_string())]
        );
        assert_eq!(response.body, "{\"ok\":true}");
    }

    #[test]
    fn from_raw_with_oversized_header_size_has_empty_body() {
        let response = HttpResponse::from_raw(204, "X-A: 1\r\n", 500);
        assert_eq!(response.headers.len(), 1);
        assert!(response.body.is_empty());
    }

    #[test]
    fn get_and_delete_use_query_string() {
        assert!(HttpMethod::Get.uses_query_string());
        assert!(HttpMethod::Delete.uses_query_string());
        assert!(!HttpMethod::Post.uses_query_string());
        assert!(!HttpMethod::Put.uses_query_string());
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}

//! Places and history tokens
//!
//! A place is a named, URL-addressable view of the console. The console keeps
//! the current place in the URL fragment as a *history token*:
//!
//! ```text
//! #configuration;path=subsystems/batch-jberet
//! #scattered-cache;cache-container=foo;name=bar
//! #deployments/deployment;name=app.war
//! ```
//!
//! Every place in a hierarchy renders as `name;key=value;...`, places are
//! joined with `/`. Names, keys and values are only ever *encoded*; the suite
//! never parses tokens back, it compares them as strings.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const HIERARCHY_SEPARATOR: char = '/';
const PARAM_SEPARATOR: char = ';';
const VALUE_SEPARATOR: char = '=';

/// Characters left alone by the path segment escaper: unreserved plus the
/// sub-delimiters, `@` and `:`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b',')
    .remove(b';')
    .remove(b'&')
    .remove(b'=')
    .remove(b'@')
    .remove(b':')
    .remove(b'+');

/// Path segment set plus `/` and `?`.
const FRAGMENT: &AsciiSet = &PATH_SEGMENT.remove(b'/').remove(b'?');

/// Percent-encodes text for use as a single path segment.
pub fn escape_path_segment(text: &str) -> String {
    utf8_percent_encode(text, PATH_SEGMENT).to_string()
}

/// Percent-encodes text for use inside a URL fragment.
pub fn escape_fragment(text: &str) -> String {
    utf8_percent_encode(text, FRAGMENT).to_string()
}

/// A place and its parameters. Parameters keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRequest {
    name_token: String,
    parameters: Vec<(String, String)>,
}

impl PlaceRequest {
    pub fn new(name_token: impl Into<String>) -> Self {
        Self {
            name_token: name_token.into(),
            parameters: Vec::new(),
        }
    }

    /// Adds a parameter. An existing parameter with the same key is replaced
    /// in place.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.parameters.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.parameters.push((key, value)),
        }
        self
    }

    pub fn name_token(&self) -> &str {
        &self.name_token
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for PlaceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TokenFormatter.to_place_token(self))
    }
}

/// Formats place requests into history tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenFormatter;

impl TokenFormatter {
    /// History token for a hierarchy of places
    pub fn to_history_token(&self, places: &[PlaceRequest]) -> String {
        places
            .iter()
            .map(|place| self.to_place_token(place))
            .collect::<Vec<_>>()
            .join(&HIERARCHY_SEPARATOR.to_string())
    }

    /// Token for a single place
    pub fn to_place_token(&self, place: &PlaceRequest) -> String {
        let mut token = escape_path_segment(&place.name_token);
        for (key, value) in &place.parameters {
            token.push(PARAM_SEPARATOR);
            token.push_str(&custom_escape(key));
            token.push(VALUE_SEPARATOR);
            token.push_str(&custom_escape(value));
        }
        token
    }
}

/// Separator characters inside keys and values are replaced by `\XX` before
/// fragment escaping, so a value never splits a token.
fn custom_escape(text: &str) -> String {
    let replaced = text
        .replace('\\', "\\5C")
        .replace(HIERARCHY_SEPARATOR, "\\2F")
        .replace(PARAM_SEPARATOR, "\\3B")
        .replace(VALUE_SEPARATOR, "\\3D");
    escape_fragment(&replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("simple", "simple")]
    #[test_case("with space", "with%20space")]
    #[test_case("a/b", "a%2Fb")]
    #[test_case("a?b#c", "a%3Fb%23c")]
    #[test_case("k=v;x", "k=v;x")]
    #[test_case("ü", "%C3%BC")]
    fn test_escape_path_segment(input: &str, expected: &str) {
        assert_eq!(escape_path_segment(input), expected);
    }

    #[test_case("a/b", "a/b")]
    #[test_case("a?b", "a?b")]
    #[test_case("a#b", "a%23b")]
    #[test_case("50%", "50%25")]
    fn test_escape_fragment(input: &str, expected: &str) {
        assert_eq!(escape_fragment(input), expected);
    }

    #[test]
    fn test_place_without_parameters() {
        let place = PlaceRequest::new("runtime");
        assert_eq!(TokenFormatter.to_history_token(&[place]), "runtime");
    }

    #[test]
    fn test_place_with_parameters_keeps_order() {
        let place = PlaceRequest::new("scattered-cache")
            .with("cache-container", "foo")
            .with("name", "bar");
        assert_eq!(
            TokenFormatter.to_place_token(&place),
            "scattered-cache;cache-container=foo;name=bar"
        );
    }

    #[test]
    fn test_parameter_replaced_in_place() {
        let place = PlaceRequest::new("p").with("a", "1").with("b", "2").with("a", "3");
        assert_eq!(place.parameter("a"), Some("3"));
        assert_eq!(TokenFormatter.to_place_token(&place), "p;a=3;b=2");
    }

    #[test]
    fn test_separators_in_values_are_escaped() {
        let place = PlaceRequest::new("configuration").with("path", "subsystems/batch;x=y");
        assert_eq!(
            TokenFormatter.to_place_token(&place),
            "configuration;path=subsystems%5C2Fbatch%5C3Bx%5C3Dy"
        );
    }

    #[test]
    fn test_hierarchy_is_joined_with_slash() {
        let places = [
            PlaceRequest::new("deployments"),
            PlaceRequest::new("deployment").with("name", "app.war"),
        ];
        assert_eq!(
            TokenFormatter.to_history_token(&places),
            "deployments/deployment;name=app.war"
        );
    }

    #[test]
    fn test_display_matches_token() {
        let place = PlaceRequest::new("batch-jberet-configuration");
        assert_eq!(place.to_string(), "batch-jberet-configuration");
    }
}

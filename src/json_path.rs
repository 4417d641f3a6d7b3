//! JSON path model and parser.
//!
//! JSON paths handed to JSON functions must be statically known, so they are
//! parsed while the SQL is rendered, from the literal value of the path
//! argument.
//!
//! # Syntax
//!
//! ```text
//! $.address."zip code"[2][$idx]
//! ┬ ───┬─── ─────┬──── ─┬─ ──┬──
//! │    │         │      │    └── parameter index (passing clause variable)
//! │    │         │      └── array index
//! │    │         └── quoted attribute
//! │    └── attribute
//! └── root
//! ```

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{map, map_res},
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};

use crate::error::{RenderError, RenderResult};

/// One step of a JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonPathElement {
    /// `.name`, `."quoted name"` or `['quoted name']`
    Attribute(String),
    /// `[n]`
    IndexAccess(i32),
    /// `[$name]`, resolved from a passing clause
    ParameterIndexAccess(String),
}

impl JsonPathElement {
    pub fn is_index(&self) -> bool {
        matches!(self, JsonPathElement::IndexAccess(_))
    }
}

impl std::fmt::Display for JsonPathElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonPathElement::Attribute(name) if is_plain_attribute(name) => write!(f, ".{}", name),
            // Quoted forms have no escapes, so pick a quote the name lacks.
            JsonPathElement::Attribute(name) if name.contains('"') => write!(f, "['{}']", name),
            JsonPathElement::Attribute(name) => write!(f, ".\"{}\"", name),
            JsonPathElement::IndexAccess(index) => write!(f, "[{}]", index),
            JsonPathElement::ParameterIndexAccess(name) => write!(f, "[${}]", name),
        }
    }
}

fn is_plain_attribute(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Parse a JSON path such as `$.a[2]."b c"[$i]` into its elements.
pub fn parse_json_path_elements(path: &str) -> RenderResult<Vec<JsonPathElement>> {
    let Some(rest) = path.strip_prefix('$') else {
        return Err(RenderError::json_path(
            path,
            format!("Json path expression must start with '$': {}", path),
        ));
    };
    match many0(parse_element)(rest) {
        Ok(("", elements)) => Ok(elements),
        Ok((remaining, _)) => Err(RenderError::json_path(
            path,
            format!(
                "Invalid json path '{}' at position {}",
                path,
                path.len() - remaining.len()
            ),
        )),
        Err(e) => Err(RenderError::json_path(
            path,
            format!("Invalid json path '{}': {:?}", path, e),
        )),
    }
}

/// Render path elements back to canonical path text.
pub fn render_json_path(elements: &[JsonPathElement]) -> String {
    let mut path = String::from("$");
    for element in elements {
        path.push_str(&element.to_string());
    }
    path
}

fn parse_element(input: &str) -> IResult<&str, JsonPathElement> {
    alt((parse_attribute, parse_bracket))(input)
}

/// `.name` or `."quoted"`
fn parse_attribute(input: &str) -> IResult<&str, JsonPathElement> {
    map(
        preceded(char('.'), alt((parse_quoted, parse_identifier))),
        |name: &str| JsonPathElement::Attribute(name.to_string()),
    )(input)
}

/// `[n]`, `[$name]` or `["name"]`
fn parse_bracket(input: &str) -> IResult<&str, JsonPathElement> {
    delimited(
        char('['),
        alt((
            map(preceded(char('$'), parse_identifier), |name: &str| {
                JsonPathElement::ParameterIndexAccess(name.to_string())
            }),
            map_res(digit1, |digits: &str| {
                digits.parse::<i32>().map(JsonPathElement::IndexAccess)
            }),
            map(alt((parse_quoted, parse_single_quoted)), |name: &str| {
                JsonPathElement::Attribute(name.to_string())
            }),
        )),
        char(']'),
    )(input)
}

fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn parse_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c| c != '"'), char('"'))(input)
}

fn parse_single_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), take_while(|c| c != '\''), char('\''))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use JsonPathElement::*;

    #[test]
    fn test_parse_mixed_path() {
        let elements = parse_json_path_elements("$.a[2].b").unwrap();
        assert_eq!(
            elements,
            vec![Attribute("a".into()), IndexAccess(2), Attribute("b".into())]
        );
    }

    #[test]
    fn test_parse_root_only() {
        assert!(parse_json_path_elements("$").unwrap().is_empty());
    }

    #[test]
    fn test_parse_quoted_and_parameter() {
        let elements = parse_json_path_elements("$.\"zip code\"['x'][$idx]").unwrap();
        assert_eq!(
            elements,
            vec![
                Attribute("zip code".into()),
                Attribute("x".into()),
                ParameterIndexAccess("idx".into()),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let err = parse_json_path_elements("a.b").unwrap_err();
        assert_eq!(err.to_string(), "Json path expression must start with '$': a.b");
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let err = parse_json_path_elements("$.a[x]").unwrap_err();
        assert!(err.to_string().contains("at position 3"), "{}", err);
    }

    #[test]
    fn test_round_trip_preserves_addressing() {
        for path in ["$", "$.a", "$[0]", "$.a[2].b", "$.\"with space\"[10].c[$p]", "$['k'][1]"] {
            let parsed = parse_json_path_elements(path).unwrap();
            let rendered = render_json_path(&parsed);
            assert_eq!(parse_json_path_elements(&rendered).unwrap(), parsed, "{}", path);
        }
        assert_eq!(render_json_path(&parse_json_path_elements("$['k'][1]").unwrap()), "$.k[1]");
    }

    #[test]
    fn test_round_trip_of_attribute_with_double_quote() {
        for path in ["$['a\"b']", "$.x['say \"hi\"'][0]", "$[\"it's\"]"] {
            let parsed = parse_json_path_elements(path).unwrap();
            let rendered = render_json_path(&parsed);
            assert_eq!(parse_json_path_elements(&rendered).unwrap(), parsed, "{}", rendered);
        }
        let parsed = parse_json_path_elements("$['a\"b']").unwrap();
        assert_eq!(parsed, vec![Attribute("a\"b".into())]);
        assert_eq!(render_json_path(&parsed), "$['a\"b']");
    }
}

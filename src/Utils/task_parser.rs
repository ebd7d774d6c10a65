/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values. Sections are returned in document order, each section is a map key -> vector of values.
///
/// Example of a document:
/// ```text
/// solver
///   tolerance: 1e-10
///   max_iterations: 200
/// variant_1
///   intervals: 9, 12, 11, 4,
///              7, 2, 5
/// ```
/// Values of a key may continue on the next line after a trailing comma.
/// Lines starting with //, # or % are comments.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Vec<Value>>;
pub type Document = Vec<(String, SectionMap)>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// Try integer, float, boolean in this order, fall back to string
    pub fn from_token(token: &str) -> Value {
        let s = token.trim();
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// integers are accepted as numbers too
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// Parses a title or a key (word characters without spaces)
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    // a single value ends at a comma, whitespace or semicolon
    let value_parser =
        take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';'));
    let mut value_parser = map(value_parser, Value::from_token);
    value_parser.parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    // newlines are allowed around the comma so long lists can be wrapped
    let separator_comma = delimited(multispace0, tag(","), multispace0);
    let mut value_parser = separated_list1(separator_comma, parse_value);
    value_parser.parse(input)
}

/// Parses a key-value pair where value is a list
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_identifier, colon_separator, parse_value_list);
    parser.parse(input)
}

/// Parses a section with a title and one or more key-value pairs
fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, multispace0));
    let (input, pairs) = parser.parse(input)?;
    let section_map: SectionMap = pairs.into_iter().collect();
    Ok((input, (title, section_map)))
}

/// Filters out comment lines (starting with //, # or %) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the sections of a document, comments must already be removed
pub fn parse_document(input: &str) -> IResult<&str, Document> {
    let mut parser = many1(delimited(multispace0, parse_section, multispace0));
    parser.parse(input)
}

/// Parses a whole document, comments included; fails if anything is left unparsed
pub fn parse_document_as(input: &str) -> Result<Document, String> {
    let filtered = filter_comments(input);
    match parse_document(&filtered) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                ));
            }
            Ok(parsed)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

/////////////////////////////TESTS////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn test_parse_identifier() {
        let (remaining, title) = parse_identifier("variant_1\n intervals: 1").unwrap();
        assert_eq!(title, "variant_1");
        assert_eq!(remaining, "\n intervals: 1");

        let (remaining, key) = parse_identifier("max_iterations: 200").unwrap();
        assert_eq!(key, "max_iterations");
        assert_eq!(remaining, ": 200");

        assert!(parse_identifier("1abc").is_err());
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("info, next").unwrap();
        assert_eq!(value, Value::String("info".to_string()));
        assert_eq!(remaining, ", next");

        let (_, value) = parse_value("123, next").unwrap();
        assert_eq!(value, Value::Integer(123));

        let (_, value) = parse_value("1e-10\n").unwrap();
        assert_eq!(value, Value::Float(1e-10));

        let (_, value) = parse_value("true").unwrap();
        assert_eq!(value, Value::Boolean(true));

        let (_, value) = parse_value("results/jm.csv").unwrap();
        assert_eq!(value, Value::String("results/jm.csv".to_string()));
    }

    #[test]
    fn test_parse_value_list_wrapped() {
        let (remaining, values) = parse_value_list("1, 2.5,\n   3\nnext: 4").unwrap();
        assert_eq!(
            values,
            vec![Value::Integer(1), Value::Float(2.5), Value::Integer(3)]
        );
        assert_eq!(remaining, "\nnext: 4");
    }

    #[test]
    fn test_parse_section_stops_at_next_title() {
        let input = "solver\n tolerance: 1e-8\n max_iterations: 50\nvariant_1\n intervals: 1, 2";
        let (remaining, (title, section)) = parse_section(input).unwrap();
        assert_eq!(title, "solver");
        assert_eq!(section["tolerance"], vec![Value::Float(1e-8)]);
        assert_eq!(section["max_iterations"], vec![Value::Integer(50)]);
        assert_eq!(remaining, "variant_1\n intervals: 1, 2");
    }

    #[test]
    fn test_parse_document_keeps_order() {
        let input = "variant_2\n intervals: 3, 4\nvariant_1\n intervals: 1, 2\n";
        let doc = parse_document_as(input).unwrap();
        let titles: Vec<&str> = doc.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["variant_2", "variant_1"]);
        assert_eq!(
            doc[1].1["intervals"],
            vec![Value::Integer(1), Value::Integer(2)]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let input = "# course task\nsolver\n// tolerance of the residual\n tolerance: 1e-9\n% done\n";
        let doc = parse_document_as(input).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].1["tolerance"], vec![Value::Float(1e-9)]);
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse_document_as("").is_err());
        assert!(parse_document_as("solver\n tolerance 1e-9\n").is_err());
        assert!(parse_document_as("solver\n tolerance: 1e-9\n : 3").is_err());
    }

    #[test]
    fn test_parse_document_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("task.txt");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "solver\n loglevel: warn\nvariant_7\n intervals: 5, 4, 11").unwrap();

        let mut content = String::new();
        File::open(&file_path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        let doc = parse_document_as(&content).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc[0].1["loglevel"][0].as_string(),
            Some(&"warn".to_string())
        );
        assert_eq!(doc[1].1["intervals"].len(), 3);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(7).as_number(), Some(7.0));
        assert_eq!(Value::Float(0.5).as_number(), Some(0.5));
        assert_eq!(Value::Boolean(true).as_number(), None);
        assert_eq!(Value::Integer(7).as_integer(), Some(7));
        assert_eq!(Value::Boolean(false).as_boolean(), Some(false));
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }
}

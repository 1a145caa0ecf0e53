//! Property path shorthand parser using chumsky
//!
//! Accepted syntax:
//!
//! ```text
//! ex:worksAt               predicate (prefixed name or plain IRI)
//! <http://ex.org/worksAt>  predicate (bracketed IRI)
//! ^ex:employs              inverse path
//! ex:a | ex:b              alternative path
//! ^(ex:a | ex:b)           grouping
//! ```
//!
//! Prefixed names are kept as written; the schema loader expands them.

use anyhow::Result;
use chumsky::prelude::*;

use super::shape::PropertyPath;

/// Chumsky-based property path parser
pub struct PathParser;

impl PathParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete path expression
    pub fn parse_path(&self, input: &str) -> Result<PropertyPath> {
        let parser = optional_whitespace()
            .ignore_then(Self::path_parser())
            .then_ignore(optional_whitespace())
            .then_ignore(end());

        parser
            .parse(input)
            .into_result()
            .map_err(|errors| anyhow::anyhow!("Parse errors: {:?}", errors))
    }

    fn path_parser<'src>() -> impl Parser<'src, &'src str, PropertyPath> + Clone {
        recursive(|path| {
            let group = path.delimited_by(
                just('(').then(optional_whitespace()),
                optional_whitespace().then(just(')')),
            );

            let atom = Self::bracketed_iri_parser()
                .or(Self::name_parser())
                .or(group);

            let unary = just('^')
                .then_ignore(optional_whitespace())
                .repeated()
                .collect::<Vec<char>>()
                .then(atom)
                .map(|(carets, path)| {
                    carets
                        .iter()
                        .fold(path, |inner, _| PropertyPath::inverse(inner))
                });

            unary
                .separated_by(just('|').padded_by(optional_whitespace()))
                .at_least(1)
                .collect::<Vec<PropertyPath>>()
                .map(|mut paths| {
                    if paths.len() == 1 {
                        paths.remove(0)
                    } else {
                        PropertyPath::Alternative(paths)
                    }
                })
        })
    }

    /// `<http://...>`
    fn bracketed_iri_parser<'src>() -> impl Parser<'src, &'src str, PropertyPath> + Clone {
        none_of(">")
            .repeated()
            .at_least(1)
            .to_slice()
            .delimited_by(just('<'), just('>'))
            .map(|s: &str| PropertyPath::predicate(s.trim()))
    }

    /// `ex:name` or a bare IRI
    fn name_parser<'src>() -> impl Parser<'src, &'src str, PropertyPath> + Clone {
        none_of(" \t\n\r|()^<>")
            .repeated()
            .at_least(1)
            .to_slice()
            .map(|s: &str| PropertyPath::predicate(s))
    }
}

impl Default for PathParser {
    fn default() -> Self {
        Self::new()
    }
}

fn optional_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t\n\r").repeated().ignored()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> PropertyPath {
        PathParser::new().parse_path(input).unwrap()
    }

    #[test]
    fn test_predicate() {
        assert_eq!(parse("ex:worksAt"), PropertyPath::predicate("ex:worksAt"));
        assert_eq!(
            parse("  <http://ex.org/worksAt> "),
            PropertyPath::predicate("http://ex.org/worksAt")
        );
    }

    #[test]
    fn test_inverse() {
        assert_eq!(
            parse("^ex:employs"),
            PropertyPath::inverse(PropertyPath::predicate("ex:employs"))
        );
        assert_eq!(
            parse("^ ^ex:p"),
            PropertyPath::inverse(PropertyPath::inverse(PropertyPath::predicate("ex:p")))
        );
    }

    #[test]
    fn test_alternative_and_grouping() {
        assert_eq!(
            parse("ex:a | ^ex:b"),
            PropertyPath::Alternative(vec![
                PropertyPath::predicate("ex:a"),
                PropertyPath::inverse(PropertyPath::predicate("ex:b")),
            ])
        );
        assert_eq!(
            parse("^(ex:a|ex:b)"),
            PropertyPath::inverse(PropertyPath::Alternative(vec![
                PropertyPath::predicate("ex:a"),
                PropertyPath::predicate("ex:b"),
            ]))
        );
    }

    #[test]
    fn test_malformed_paths() {
        let parser = PathParser::new();
        assert!(parser.parse_path("").is_err());
        assert!(parser.parse_path("ex:a |").is_err());
        assert!(parser.parse_path("(ex:a").is_err());
        assert!(parser.parse_path("<unterminated").is_err());
    }
}

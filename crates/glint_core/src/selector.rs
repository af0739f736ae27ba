//! CSS selector subset
//!
//! Supports what effect configuration needs to locate targets:
//!
//! - type selectors (`code`) and the universal selector (`*`)
//! - `#id`, `.class`, `[attr]` and `[attr=value]` (value optionally quoted)
//! - compound selectors (`.stat[data-target]`)
//! - the descendant combinator (`.window-body code`)
//! - selector lists (`.section-tag, .section-title`)
//!
//! Whitespace, including newlines, is allowed around list separators so that
//! long lists can be written one selector per line in config files.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, cut, map, opt},
    error::{ErrorKind, ParseError as NomParseError, VerboseError},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, tuple},
    Finish, IResult,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::dom::{Document, NodeId};
use crate::error::SelectorError;

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Attribute condition inside `[...]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeMatch {
    Exists(String),
    Equals(String, String),
}

/// A sequence of simple selectors that all apply to one element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Lowercase tag name; `None` matches any element
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: SmallVec<[String; 2]>,
    pub attributes: SmallVec<[AttributeMatch; 1]>,
}

impl CompoundSelector {
    fn matches<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        if let Some(ref expected) = self.tag {
            match doc.tag(node) {
                Some(actual) if actual.eq_ignore_ascii_case(expected) => {}
                _ => return false,
            }
        }

        if let Some(ref id) = self.id {
            if doc.attribute(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.iter().all(|class| doc.has_class(node, class)) {
            return false;
        }

        self.attributes.iter().all(|condition| match condition {
            AttributeMatch::Exists(name) => doc.attribute(node, name).is_some(),
            AttributeMatch::Equals(name, value) => {
                doc.attribute(node, name).as_deref() == Some(value.as_str())
            }
        })
    }
}

/// Compound selectors joined by descendant combinators, outermost first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
}

impl ComplexSelector {
    fn matches<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };

        if !subject.matches(doc, node) {
            return false;
        }

        // Greedy ancestor walk is exact for descendant-only chains
        let mut remaining = ancestors.iter().rev().peekable();
        let mut current = doc.parent(node);
        while let Some(compound) = remaining.peek() {
            let Some(ancestor) = current else {
                return false;
            };
            if compound.matches(doc, ancestor) {
                remaining.next();
            }
            current = doc.parent(ancestor);
        }

        true
    }
}

/// A parsed selector list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
    source: String,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        match all_consuming(delimited(multispace0, selector_list, multispace0))(input).finish() {
            Ok((_, alternatives)) => Ok(Self {
                alternatives,
                source: normalize_source(input),
            }),
            Err(err) => {
                let remaining = err.errors.first().map(|(rest, _)| rest.len()).unwrap_or(0);
                Err(SelectorError::Invalid {
                    input: input.to_string(),
                    offset: input.len() - remaining,
                })
            }
        }
    }

    /// Normalized source text (list entries joined by `, `)
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    /// Check whether the element matches any selector in the list
    pub fn matches<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(doc, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Selector::parse(&value)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.source
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn normalize_source(input: &str) -> String {
    input
        .split(',')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn attribute_value(input: &str) -> ParseResult<&str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        identifier,
    ))(input)
}

/// Parse `[name]` or `[name=value]`
fn attribute_selector(input: &str) -> ParseResult<AttributeMatch> {
    let (input, _) = char('[')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, name) = cut(identifier)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = opt(preceded(
        tuple((char('='), multispace0)),
        cut(attribute_value),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = cut(char(']'))(input)?;

    let condition = match value {
        Some(value) => AttributeMatch::Equals(name.to_string(), value.to_string()),
        None => AttributeMatch::Exists(name.to_string()),
    };
    Ok((input, condition))
}

enum Simple<'a> {
    Id(&'a str),
    Class(&'a str),
    Attribute(AttributeMatch),
}

fn compound_selector(input: &str) -> ParseResult<CompoundSelector> {
    let (input, element) = opt(alt((identifier, tag("*"))))(input)?;
    let (input, parts) = many0(alt((
        map(preceded(char('#'), cut(identifier)), Simple::Id),
        map(preceded(char('.'), cut(identifier)), Simple::Class),
        map(attribute_selector, Simple::Attribute),
    )))(input)?;

    if element.is_none() && parts.is_empty() {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Many1,
        )));
    }

    let mut compound = CompoundSelector {
        tag: element
            .filter(|name| *name != "*")
            .map(|name| name.to_ascii_lowercase()),
        ..Default::default()
    };
    for part in parts {
        match part {
            Simple::Id(id) => compound.id = Some(id.to_string()),
            Simple::Class(class) => compound.classes.push(class.to_string()),
            Simple::Attribute(condition) => compound.attributes.push(condition),
        }
    }

    Ok((input, compound))
}

fn complex_selector(input: &str) -> ParseResult<ComplexSelector> {
    map(separated_list1(multispace1, compound_selector), |compounds| {
        ComplexSelector { compounds }
    })(input)
}

fn selector_list(input: &str) -> ParseResult<Vec<ComplexSelector>> {
    separated_list1(
        tuple((multispace0, char(','), multispace0)),
        complex_selector,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DocumentTree;

    #[test]
    fn test_parse_compound() {
        let selector = Selector::parse(".stat[data-target]").unwrap();
        let compound = &selector.alternatives()[0].compounds[0];

        assert_eq!(compound.tag, None);
        assert_eq!(compound.classes.as_slice(), ["stat".to_string()]);
        assert_eq!(
            compound.attributes.as_slice(),
            [AttributeMatch::Exists("data-target".to_string())]
        );
    }

    #[test]
    fn test_parse_multiline_list() {
        let selector = Selector::parse(
            "
            .section-tag,
            .section-title ,
            .window-body   code
        ",
        )
        .unwrap();

        assert_eq!(selector.alternatives().len(), 3);
        assert_eq!(
            selector.as_str(),
            ".section-tag, .section-title, .window-body code"
        );
    }

    #[test]
    fn test_parse_quoted_attribute_value() {
        let selector = Selector::parse(r#"button[type="submit"]"#).unwrap();
        let compound = &selector.alternatives()[0].compounds[0];

        assert_eq!(compound.tag.as_deref(), Some("button"));
        assert_eq!(
            compound.attributes.as_slice(),
            [AttributeMatch::Equals(
                "type".to_string(),
                "submit".to_string()
            )]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse(".stat["),
            Err(SelectorError::Invalid { .. })
        ));
        assert!(matches!(
            Selector::parse(".a,,.b"),
            Err(SelectorError::Invalid { .. })
        ));
        assert!(matches!(
            Selector::parse("div > p"),
            Err(SelectorError::Invalid { .. })
        ));
    }

    #[test]
    fn test_matching() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let window = tree.append(root, "div").class("window-body").finish();
        let pre = tree.append(window, "pre").finish();
        let code = tree.append(pre, "code").id("snippet").finish();
        let stray = tree.append(root, "code").finish();

        let descendant = Selector::parse(".window-body code").unwrap();
        assert!(descendant.matches(&tree, code));
        assert!(!descendant.matches(&tree, stray));

        let by_id = Selector::parse("code#snippet").unwrap();
        assert!(by_id.matches(&tree, code));
        assert!(!by_id.matches(&tree, stray));

        let universal = Selector::parse("*").unwrap();
        assert_eq!(tree.select_all(&universal).len(), 5);
    }

    #[test]
    fn test_attribute_value_matching() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let submit = tree.append(root, "button").attr("type", "submit").finish();
        let plain = tree.append(root, "button").attr("type", "button").finish();

        let selector = Selector::parse("button[type=submit]").unwrap();
        assert!(selector.matches(&tree, submit));
        assert!(!selector.matches(&tree, plain));
    }
}

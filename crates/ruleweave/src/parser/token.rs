//! Low-level recognizers for rule references and bracketed action groups.
//!
//! These are winnow parsers over `&str`. A failed parse may leave the input
//! partially consumed, so attempts at arbitrary positions run on a copy.

use winnow::combinator::{preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{literal, take_while};

/// Character delimiting a rule reference on both sides.
pub const MARKER: char = '#';

/// A rule reference recognized in text, borrowed from the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken<'a> {
    /// The whole token, markers included (e.g. `#[k:v]name.s#`).
    pub source: &'a str,
    /// Leading action groups, concatenated (e.g. `[k:v]`). Empty when absent.
    pub actions: &'a str,
    /// Rule name.
    pub name: &'a str,
    /// Modifier specs without their leading dots (e.g. `s`, `replace(a,b)`).
    pub modifiers: Vec<&'a str>,
}

impl<'a> RuleToken<'a> {
    /// The token without its leading actions, rewrapped in markers.
    pub fn without_actions(&self) -> String {
        let start = MARKER.len_utf8() + self.actions.len();
        let end = self.source.len() - MARKER.len_utf8();
        format!("{MARKER}{}{MARKER}", &self.source[start..end])
    }
}

/// A piece of mixed text: either a literal run or a rule reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a> {
    Literal(&'a str),
    Rule(RuleToken<'a>),
}

impl<'a> Piece<'a> {
    /// The source text this piece covers.
    pub fn source(&self) -> &'a str {
        match self {
            Piece::Literal(text) => text,
            Piece::Rule(token) => token.source,
        }
    }
}

fn backtrack<O>() -> ModalResult<O> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Split `input` at `offset`, returning the consumed prefix.
fn advance<'i>(input: &mut &'i str, offset: usize) -> &'i str {
    let (taken, rest) = input.split_at(offset);
    *input = rest;
    taken
}

/// Parse a rule name (ASCII alphanumeric).
pub(crate) fn rule_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric()).parse_next(input)
}

/// Parse one bracketed action group, brackets included. Groups may nest.
pub(crate) fn action_group<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let source: &'i str = *input;
    if !source.starts_with('[') {
        return backtrack();
    }
    let mut depth = 0usize;
    for (offset, c) in source.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(advance(input, offset + 1));
                }
            }
            _ => {}
        }
    }
    backtrack()
}

/// Parse the body of a modifier spec.
///
/// A body runs until the next marker, or the next `.` outside parentheses.
fn modifier_body<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let source: &'i str = *input;
    let mut depth = 0usize;
    let mut end = source.len();
    for (offset, c) in source.char_indices() {
        match c {
            MARKER => {
                end = offset;
                break;
            }
            '.' if depth == 0 => {
                end = offset;
                break;
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    if end == 0 {
        return backtrack();
    }
    Ok(advance(input, end))
}

/// Parse a dot-prefixed modifier spec: `.name` or `.name(p1,p2)`.
pub(crate) fn modifier_spec<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded('.', modifier_body).parse_next(input)
}

/// Parse a rule reference: `#` actions* name modifiers* `#`.
pub(crate) fn rule_token<'i>(input: &mut &'i str) -> ModalResult<RuleToken<'i>> {
    let start = *input;
    literal(MARKER).parse_next(input)?;
    let after_marker = *input;
    let _: Vec<&str> = repeat(0.., action_group).parse_next(input)?;
    let actions = &after_marker[..after_marker.len() - input.len()];
    let name = rule_name(input)?;
    let modifiers: Vec<&str> = repeat(0.., modifier_spec).parse_next(input)?;
    literal(MARKER).parse_next(input)?;
    let source = &start[..start.len() - input.len()];
    Ok(RuleToken {
        source,
        actions,
        name,
        modifiers,
    })
}

/// Parse one or more concatenated action groups.
pub(crate) fn action_groups<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    repeat(1.., action_group).parse_next(input)
}

/// Run `parser` over all of `text`, succeeding only when nothing is left over.
pub(crate) fn parse_all<'i, O>(
    text: &'i str,
    mut parser: impl FnMut(&mut &'i str) -> ModalResult<O>,
) -> Option<O> {
    let mut input = text;
    let output = parser(&mut input).ok()?;
    input.is_empty().then_some(output)
}

/// Split text into literal runs and rule references, preserving order.
///
/// A marker that does not open a well-formed reference stays literal.
pub fn split_rules(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut literal_start = 0;
    let mut offset = 0;
    while let Some(found) = text[offset..].find(MARKER) {
        let at = offset + found;
        let mut cursor = &text[at..];
        match rule_token(&mut cursor) {
            Ok(token) => {
                if literal_start < at {
                    pieces.push(Piece::Literal(&text[literal_start..at]));
                }
                offset = at + token.source.len();
                literal_start = offset;
                pieces.push(Piece::Rule(token));
            }
            Err(_) => offset = at + MARKER.len_utf8(),
        }
    }
    if literal_start < text.len() {
        pieces.push(Piece::Literal(&text[literal_start..]));
    }
    pieces
}

/// Check whether text contains at least one rule reference.
pub fn contains_rule(text: &str) -> bool {
    split_rules(text)
        .iter()
        .any(|piece| matches!(piece, Piece::Rule(_)))
}

/// Check whether text consists solely of one or more action groups.
pub fn is_actions_only(text: &str) -> bool {
    parse_all(text, action_groups).is_some()
}

/// Check whether text needs expansion (has a rule reference or is pure actions).
pub fn is_expandable(text: &str) -> bool {
    is_actions_only(text) || contains_rule(text)
}

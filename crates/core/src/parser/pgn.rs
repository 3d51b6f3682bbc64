//! Tolerant PGN reading
//!
//! Move text is reduced to bare SAN tokens without enforcing a grammar;
//! whatever the tokens mean is decided later by the SAN resolver.

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use serde::Serialize;
use std::io::Cursor;
use std::ops::ControlFlow;

const RESULT_MARKERS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Ordered SAN tokens of the main line.
///
/// Header lines, `{...}` and `;` comments, result markers, move numbers and
/// numeric annotation glyphs (`$1`) are dropped. Empty or header-only input
/// yields an empty list.
pub fn tokenize(raw: &str) -> Vec<String> {
    let without_headers: Vec<&str> = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with('['))
        .collect();
    let text = strip_brace_comments(&without_headers.join("\n"));
    let text = text
        .lines()
        .map(strip_line_comment)
        .collect::<Vec<_>>()
        .join(" ");

    let tokens: Vec<String> = text
        .split_whitespace()
        .flat_map(split_move_number)
        .filter(|tok| !is_move_number(tok))
        .filter(|tok| !RESULT_MARKERS.contains(tok))
        .filter(|tok| !is_nag(tok))
        .map(str::to_string)
        .collect();
    tokens
}

fn strip_brace_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let close = match rest[open..].find('}') {
            Some(offset) => open + offset,
            // unterminated comment is left as text
            None => break,
        };
        out.push_str(&rest[..open]);
        out.push(' ');
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    out
}

fn strip_line_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// "12.Nf3" -> ["12.", "Nf3"], "12...Nf6" -> ["12...", "Nf6"]
fn split_move_number(token: &str) -> Vec<&str> {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || !token[digits..].starts_with('.') {
        return vec![token];
    }
    let dots = token[digits..].chars().take_while(|c| *c == '.').count();
    let (number, rest) = token.split_at(digits + dots);
    if rest.is_empty() {
        vec![number]
    } else {
        vec![number, rest]
    }
}

fn is_move_number(token: &str) -> bool {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && token[digits..].starts_with('.')
}

fn is_nag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('$') && token[1..].chars().all(|c| c.is_ascii_digit())
}

/// Seven-tag-roster subset of the first game's headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PgnHeaders {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
}

impl PgnHeaders {
    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }
}

struct HeaderParser;

impl Visitor for HeaderParser {
    type Tags = PgnHeaders;
    type Movetext = PgnHeaders;
    type Output = PgnHeaders;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(PgnHeaders::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let name_str = String::from_utf8_lossy(name);
        let value_str = value.decode_utf8_lossy().to_string();

        match name_str.as_ref() {
            "Event" => tags.event = Some(value_str),
            "Site" => tags.site = Some(value_str),
            "Date" => tags.date = Some(value_str),
            "White" => tags.white = Some(value_str),
            "Black" => tags.black = Some(value_str),
            "Result" => tags.result = Some(value_str),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(tags)
    }

    // Move text is tokenized separately; only the headers matter here.
    fn san(&mut self, _movetext: &mut Self::Movetext, _san: SanPlus) -> ControlFlow<Self::Output> {
        ControlFlow::Continue(())
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        movetext
    }
}

/// Headers of the first game; missing or unreadable tags are `None`
pub fn parse_headers(raw: &str) -> PgnHeaders {
    let mut parser = HeaderParser;
    let cursor = Cursor::new(raw.as_bytes());
    let mut reader = pgn_reader::Reader::new(cursor);

    match reader.read_game(&mut parser) {
        Ok(Some(headers)) => headers,
        Ok(None) | Err(_) => PgnHeaders::default(),
    }
}

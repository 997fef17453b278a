//! Table text parsing
//!
//! Recovers the structured [`ZoneMap`] form from previously serialized or
//! hand-edited table text. Two layers:
//!
//! - a **section scanner** that locates one `Name = { ... }` block inside
//!   arbitrary surrounding content (other categories, settings blobs) by
//!   tracking brace depth, skipping string literals and `--` comments —
//!   a `}` inside a quoted string or a deeper table never closes a section
//! - a **tokenizer + recursive-descent parser** for the bracketed
//!   `[key] = value` grammar inside a section
//!
//! Parsing is lossy regarding comments and formatting by design; the
//! structural round trip `parse(render(t)) == t` is the contract. Entries
//! that are not numeric `[int] = int` pairs at the expected nesting level
//! are skipped, not errors: the persisted file may carry settings and other
//! addon state the harvest has no interest in.

use crate::ZoneMap;
use gathermine_core::types::Category;
use std::collections::BTreeMap;
use std::ops::Range;

/// Locate a `name = { ... }` section, returning its full byte span
///
/// The name must stand alone (not a fragment of a longer identifier) and be
/// followed by `=` and an opening brace. Returns `None` when the section is
/// absent or its braces never balance — callers treat both as "no usable
/// section".
pub fn section_span(text: &str, name: &str) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let mut search = 0;
    while let Some(found) = text[search..].find(name) {
        let start = search + found;
        let name_end = start + name.len();
        search = start + 1;

        let prev_ok = start == 0 || !is_ident_byte(bytes[start - 1]);
        let next_ok = name_end >= bytes.len() || !is_ident_byte(bytes[name_end]);
        if !prev_ok || !next_ok {
            continue;
        }

        let mut i = skip_space(bytes, name_end);
        if i >= bytes.len() || bytes[i] != b'=' {
            continue;
        }
        i = skip_space(bytes, i + 1);
        if i >= bytes.len() || bytes[i] != b'{' {
            continue;
        }

        // a located section with unbalanced braces is malformed, not a
        // reason to keep scanning
        return balance_braces(bytes, i).map(|close| start..close + 1);
    }
    None
}

/// The text between a section's outer braces
pub fn section_body<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let span = section_span(text, name)?;
    let section = &text[span];
    let open = section.find('{')?;
    Some(&section[open + 1..section.len() - 1])
}

/// Parse one category's table out of a full document
///
/// Surrounding content is ignored; only the `GatherMate2<label>DB` section
/// is read. `None` means the section is absent or malformed — the caller
/// decides whether that degrades to empty (merge as first write).
pub fn parse_category(text: &str, category: Category) -> Option<ZoneMap> {
    section_body(text, &category.table_name()).map(parse_zone_map)
}

/// Parse a section body into the structured zone map
///
/// Tolerant harvest: numeric `[zone] = { [coord] = source, ... }` entries
/// are collected, everything else (string keys, scalar zone values, deeper
/// nesting) is skipped with balanced-brace awareness.
pub fn parse_zone_map(body: &str) -> ZoneMap {
    let mut lex = Lexer::new(body);
    let mut zones = ZoneMap::new();

    while let Some(token) = lex.next_token() {
        match token {
            Token::LBracket => {
                if let Some((key, value)) = keyed_value(&mut lex) {
                    if let (Some(zone_id), Value::Table(entries)) = (key, value) {
                        zones.entry(zone_id).or_default().extend(entries);
                    }
                }
            }
            Token::LBrace => skip_table(&mut lex),
            _ => {}
        }
    }
    zones
}

// ============================================================================
// Recursive descent
// ============================================================================

enum Value {
    Int(u64),
    Table(BTreeMap<u64, String>),
    Other,
}

/// Parse the remainder of a `[key] = value` entry, the `[` already consumed
///
/// Returns the numeric key (if the key was numeric) and the parsed value.
/// `None` means the token stream did not continue as an entry at all.
fn keyed_value(lex: &mut Lexer<'_>) -> Option<(Option<u64>, Value)> {
    let key = match lex.next_token()? {
        Token::Int(n) => Some(n),
        _ => None,
    };
    if !matches!(lex.next_token()?, Token::RBracket) {
        return None;
    }
    if !matches!(lex.next_token()?, Token::Equals) {
        return None;
    }
    let value = match lex.next_token()? {
        Token::Int(n) => Value::Int(n),
        Token::LBrace => Value::Table(inner_entries(lex)),
        _ => Value::Other,
    };
    Some((key, value))
}

/// Collect `[coord] = source` pairs until the zone table's closing brace
fn inner_entries(lex: &mut Lexer<'_>) -> BTreeMap<u64, String> {
    let mut entries = BTreeMap::new();
    while let Some(token) = lex.next_token() {
        match token {
            Token::RBrace => break,
            Token::LBracket => {
                if let Some((key, value)) = keyed_value(lex) {
                    if let (Some(coord), Value::Int(source)) = (key, value) {
                        entries.insert(coord, source.to_string());
                    }
                }
            }
            Token::LBrace => skip_table(lex),
            _ => {}
        }
    }
    entries
}

/// Skip a balanced table whose opening brace was already consumed
fn skip_table(lex: &mut Lexer<'_>) {
    let mut depth = 1usize;
    while depth > 0 {
        match lex.next_token() {
            Some(Token::LBrace) => depth += 1,
            Some(Token::RBrace) => depth -= 1,
            Some(_) => {}
            None => break,
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, PartialEq)]
enum Token {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
    Comma,
    Int(u64),
    /// A quoted string, an identifier, or any other non-structural run
    Other,
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.pos = skip_space(self.bytes, self.pos);
            if self.pos >= self.bytes.len() {
                return None;
            }
            let b = self.bytes[self.pos];

            // line comment
            if b == b'-' && self.bytes.get(self.pos + 1) == Some(&b'-') {
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }

            self.pos += 1;
            return Some(match b {
                b'{' => Token::LBrace,
                b'}' => Token::RBrace,
                b'[' => Token::LBracket,
                b']' => Token::RBracket,
                b'=' => Token::Equals,
                b',' => Token::Comma,
                b'"' => {
                    self.skip_string();
                    Token::Other
                }
                b'0'..=b'9' => {
                    let start = self.pos - 1;
                    while self
                        .bytes
                        .get(self.pos)
                        .map_or(false, |b| b.is_ascii_digit())
                    {
                        self.pos += 1;
                    }
                    // digit runs overflowing u64 become Other, never truncate
                    match std::str::from_utf8(&self.bytes[start..self.pos])
                        .ok()
                        .and_then(|s| s.parse::<u64>().ok())
                    {
                        Some(n) => Token::Int(n),
                        None => Token::Other,
                    }
                }
                _ => {
                    // identifier or unrecognized run; consume ident tail
                    while self.bytes.get(self.pos).map_or(false, |b| is_ident_byte(*b)) {
                        self.pos += 1;
                    }
                    Token::Other
                }
            });
        }
    }

    fn skip_string(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }
}

/// Find the closing brace matching the one at `open`, depth-tracked
///
/// String literals and `--` comments are opaque: braces inside them do not
/// count.
fn balance_braces(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn skip_space(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

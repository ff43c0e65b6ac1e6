//! Reader for Doxygen `search/all_*.js` files.
//!
//! Each file is a JavaScript assignment of nested literal arrays:
//!
//! ```text
//! var searchData=
//! [
//!   ['eepfs_5fread_318',['eepfs_read',['../eepromfs_8c.html#a3dae',1,'eepfs_read(...):&#160;eepromfs.c'],...]],
//! ];
//! ```
//!
//! Only the display key and the `[url, flag, label]` target triples are kept.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::{Result, SymdexError};
use crate::index::{RawRecord, RawTarget};

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"^\s*var\s+searchData\s*=").unwrap();
    static ref ENTITY: Regex =
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|amp|lt|gt|quot|apos|nbsp);").unwrap();
}

/// Deepest array nesting accepted; real files nest four levels.
const MAX_DEPTH: usize = 16;

/// Records read from one file plus the entries that had the wrong shape.
#[derive(Debug, Default)]
pub struct SearchData {
    pub records: Vec<RawRecord>,
    pub errors: Vec<SymdexError>,
}

#[derive(Debug)]
enum Value {
    Str(String),
    Num,
    List(Vec<(usize, Value)>),
}

impl Value {
    fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn as_list(&self) -> Option<&[(usize, Value)]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Parse a whole searchData file.
///
/// A file that is not a searchData assignment, or whose literal does not
/// parse, is an error. Entries with an unexpected shape are reported in
/// [`SearchData::errors`] and skipped.
pub fn parse(source_name: &str, text: &str) -> Result<SearchData> {
    let header = HEADER.find(text).ok_or_else(|| SymdexError::Parse {
        source_name: source_name.to_string(),
        offset: 0,
        message: "missing `var searchData=` header".to_string(),
    })?;

    let mut parser = Parser {
        source_name,
        src: text,
        pos: header.end(),
        depth: 0,
    };
    let top = parser.value()?;
    parser.skip_ws();
    if parser.peek() == Some(';') {
        parser.pos += 1;
    }
    parser.skip_ws();
    if parser.pos < text.len() {
        return Err(parser.error("trailing content after searchData literal"));
    }

    let Value::List(entries) = top else {
        return Err(SymdexError::Parse {
            source_name: source_name.to_string(),
            offset: header.end(),
            message: "searchData is not an array".to_string(),
        });
    };

    let mut out = SearchData::default();
    for (offset, entry) in &entries {
        match entry_to_record(entry) {
            Some(record) => out.records.push(record),
            None => out.errors.push(SymdexError::Parse {
                source_name: source_name.to_string(),
                offset: *offset,
                message: "entry is not [id, [key, [url, flag, label], ...]]".to_string(),
            }),
        }
    }

    Ok(out)
}

fn entry_to_record(entry: &Value) -> Option<RawRecord> {
    let [_, (_, body)] = entry.as_list()? else {
        return None;
    };
    let (first, rest) = body.as_list()?.split_first()?;
    let key = decode_entities(first.1.as_str()?);

    let targets = rest
        .iter()
        .map(|(_, t)| target_from(t))
        .collect::<Option<Vec<_>>>()?;

    Some(RawRecord::new(key, targets))
}

fn target_from(value: &Value) -> Option<RawTarget> {
    let items = value.as_list()?;
    let url = items.first()?.1.as_str()?;
    let label = match items.get(2) {
        Some((_, v)) => v.as_str()?,
        None => "",
    };

    let (document_path, anchor) = split_url(url);
    Some(RawTarget::new(
        decode_entities(document_path),
        decode_entities(anchor),
        decode_entities(label),
    ))
}

/// `../eepromfs_8h.html#a6dc0` -> (`eepromfs_8h.html`, `a6dc0`)
fn split_url(url: &str) -> (&str, &str) {
    let mut path = url.trim();
    while let Some(rest) = path.strip_prefix("../") {
        path = rest;
    }
    path.split_once('#').unwrap_or((path, ""))
}

pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => {
                    let code = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        name[1..].parse::<u32>().ok()
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

struct Parser<'a> {
    source_name: &'a str,
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&self, message: impl Into<String>) -> SymdexError {
        SymdexError::Parse {
            source_name: self.source_name.to_string(),
            offset: self.pos,
            message: message.into(),
        }
    }

    fn value(&mut self) -> Result<Value> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.list(),
            Some(q @ ('\'' | '"')) => self.string(q).map(Value::Str),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) => Err(self.error(format!("unexpected character {:?}", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn list(&mut self) -> Result<Value> {
        if self.depth == MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let items = self.items();
        self.depth -= 1;
        items
    }

    fn items(&mut self) -> Result<Value> {
        self.bump();
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::List(items));
            }

            let offset = self.pos;
            items.push((offset, self.value()?));

            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(Value::List(items)),
                Some(c) => return Err(self.error(format!("expected `,` or `]`, found {:?}", c))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String> {
        self.bump();
        let mut out = String::new();

        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('u') => {
                        let end = self.pos + 4;
                        let code = self
                            .src
                            .get(self.pos..end)
                            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                            .and_then(char::from_u32)
                            .ok_or_else(|| self.error("bad \\u escape"))?;
                        self.pos = end;
                        out.push(code);
                    }
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.src[start..self.pos]
            .parse::<f64>()
            .map(|_| Value::Num)
            .map_err(|_| self.error("bad number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"var searchData=
[
  ['eepfs_5fclose_306',['eepfs_close',['../eepromfs_8h.html#a6dc04e21588af5d151c605ed8b383a86',1,'eepfs_close(void):&#160;eepromfs.c'],['../eepromfs_8c.html#a6dc04e21588af5d151c605ed8b383a86',1,'eepfs_close(void):&#160;eepromfs.c']]],
  ['eepromfs_2ec_333',['eepromfs.c',['../eepromfs_8c.html',1,'']]],
  ['exception_20handler_347',['Exception Handler',['../group__exceptions.html',1,'']]]
];
"#;

    #[test]
    fn parses_doxygen_entries() {
        let data = parse("all_6.js", SAMPLE).unwrap();
        assert!(data.errors.is_empty());
        assert_eq!(data.records.len(), 3);

        let close = &data.records[0];
        assert_eq!(close.key, "eepfs_close");
        assert_eq!(close.targets.len(), 2);
        assert_eq!(close.targets[0].document_path, "eepromfs_8h.html");
        assert_eq!(close.targets[0].anchor, "a6dc04e21588af5d151c605ed8b383a86");
        assert_eq!(close.targets[0].label, "eepfs_close(void):\u{a0}eepromfs.c");

        let file = &data.records[1];
        assert_eq!(file.key, "eepromfs.c");
        assert_eq!(file.targets[0].anchor, "");
        assert_eq!(file.targets[0].label, "");

        assert_eq!(data.records[2].key, "Exception Handler");
    }

    #[test]
    fn bad_entry_is_reported_and_skipped() {
        let text = "var searchData=[['a_1',['a',['../a.html',1,'a.h']]],['b_2', 42],];";
        let data = parse("all_0.js", text).unwrap();
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.errors.len(), 1);
        assert_eq!(data.errors[0].code(), "PARSE_ERROR");
    }

    #[test]
    fn rejects_non_searchdata_files() {
        let err = parse("search.js", "function searchBox() {}").unwrap_err();
        assert!(matches!(err, SymdexError::Parse { offset: 0, .. }));

        let err = parse("all_1.js", "var searchData=[['a',").unwrap_err();
        assert!(matches!(err, SymdexError::Parse { .. }));

        let err = parse("all_2.js", "var searchData=[]; extra").unwrap_err();
        assert!(matches!(err, SymdexError::Parse { .. }));
    }

    #[test]
    fn deep_nesting_is_a_parse_error() {
        let text = format!("var searchData={}", "[".repeat(200_000));
        let err = parse("all_0.js", &text).unwrap_err();
        match err {
            SymdexError::Parse { message, offset, .. } => {
                assert_eq!(message, "nesting too deep");
                assert_eq!(offset, "var searchData=".len() + MAX_DEPTH);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let nested = format!("var searchData={}{};", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        let data = parse("all_1.js", &nested).unwrap();
        assert_eq!(data.errors.len(), 1);
    }

    #[test]
    fn handles_escapes_and_entities() {
        let text = r#"var searchData=[['x',['operator\'s &amp; &lt;T&gt;',['../x.html#a1',1,'f(int):&#xA0;x.h']]]];"#;
        let data = parse("all_3.js", text).unwrap();
        let record = &data.records[0];
        assert_eq!(record.key, "operator's & <T>");
        assert_eq!(record.targets[0].label, "f(int):\u{a0}x.h");
    }

    #[test]
    fn unknown_entities_are_left_alone() {
        assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
        assert_eq!(decode_entities("&#160;"), "\u{a0}");
        assert_eq!(decode_entities("plain"), "plain");
    }

    #[test]
    fn strips_relative_prefix_from_urls() {
        assert_eq!(split_url("../../group__joybus.html#ga8d"), ("group__joybus.html", "ga8d"));
        assert_eq!(split_url("eepromfs_8h.html"), ("eepromfs_8h.html", ""));
    }
}

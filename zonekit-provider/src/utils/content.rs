//! Record content transport encoding
//!
//! Vendors store some record types in a "presentation" form that differs from
//! what a caller writes: TXT values are quoted character-strings, CNAME
//! targets are absolute names. [`ContentCodec`] converts between the caller
//! form and the transport form. `decode(encode(s)) == s` holds for every
//! string, including ones with embedded quotes, backslashes and whitespace.

use super::names::full_name;

/// Maximum length (in bytes) of a single DNS character-string.
const TXT_SEGMENT_LIMIT: usize = 255;

/// How a vendor expects CNAME targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CnameForm {
    /// Stored exactly as written.
    Passthrough,
    /// Stored as an absolute name with trailing dot.
    Absolute,
}

/// Per-vendor content codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentCodec {
    /// Whether LOC values are quoted like TXT values.
    pub quote_loc: bool,
    /// CNAME target handling.
    pub cname: CnameForm,
}

impl ContentCodec {
    /// Quote TXT and LOC, make CNAME absolute (PowerDNS style).
    pub const POWERDNS: Self = Self {
        quote_loc: true,
        cname: CnameForm::Absolute,
    };

    /// Quote TXT only, make CNAME absolute.
    pub const QUOTED_TXT_ABSOLUTE_CNAME: Self = Self {
        quote_loc: false,
        cname: CnameForm::Absolute,
    };

    /// Quote TXT only, leave CNAME untouched.
    pub const QUOTED_TXT: Self = Self {
        quote_loc: false,
        cname: CnameForm::Passthrough,
    };

    fn is_quoted(self, rtype: &str) -> bool {
        rtype.eq_ignore_ascii_case("TXT") || (self.quote_loc && rtype.eq_ignore_ascii_case("LOC"))
    }

    /// Converts caller content into the vendor's transport form.
    pub fn encode(self, domain: &str, rtype: &str, content: &str) -> String {
        if self.is_quoted(rtype) {
            quote_txt(content)
        } else if rtype.eq_ignore_ascii_case("CNAME") && self.cname == CnameForm::Absolute {
            full_name(domain, content)
        } else {
            content.to_string()
        }
    }

    /// Converts a transport value back into caller content.
    pub fn decode(self, domain: &str, rtype: &str, raw: &str) -> String {
        if self.is_quoted(rtype) {
            unquote_txt(raw)
        } else if rtype.eq_ignore_ascii_case("CNAME") && self.cname == CnameForm::Absolute {
            full_name(domain, raw)
        } else {
            raw.to_string()
        }
    }

    /// Comparison form of caller content: what a stored value decodes to.
    pub fn canonical(self, domain: &str, rtype: &str, content: &str) -> String {
        self.decode(domain, rtype, &self.encode(domain, rtype, content))
    }
}

/// Encodes `text` as one or more quoted character-strings.
///
/// Backslashes and quotes are escaped; text longer than 255 bytes is split
/// into several segments joined by a single space.
pub fn quote_txt(text: &str) -> String {
    split_segments(text)
        .into_iter()
        .map(|segment| {
            let mut quoted = String::with_capacity(segment.len() + 2);
            quoted.push('"');
            for c in segment.chars() {
                if c == '"' || c == '\\' {
                    quoted.push('\\');
                }
                quoted.push(c);
            }
            quoted.push('"');
            quoted
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes quoted character-strings back into plain text.
///
/// Unquoted input is returned unchanged. Input with stray text outside
/// quotes loses a single layer of surrounding quotes.
pub fn unquote_txt(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with('"') {
        return raw.to_string();
    }
    parse_segments(trimmed).unwrap_or_else(|| strip_one_layer(trimmed).to_string())
}

fn split_segments(text: &str) -> Vec<&str> {
    if text.len() <= TXT_SEGMENT_LIMIT {
        return vec![text];
    }
    let mut segments = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = (start + TXT_SEGMENT_LIMIT).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        segments.push(&text[start..end]);
        start = end;
    }
    segments
}

fn parse_segments(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut inside = false;

    while let Some(c) = chars.next() {
        if inside {
            match c {
                '\\' => out.push(chars.next()?),
                '"' => inside = false,
                _ => out.push(c),
            }
        } else {
            match c {
                '"' => inside = true,
                c if c.is_whitespace() => {}
                _ => return None,
            }
        }
    }

    (!inside).then_some(out)
}

fn strip_one_layer(raw: &str) -> &str {
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    raw.strip_suffix('"').unwrap_or(raw)
}

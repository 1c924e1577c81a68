//! Python string literal decoding

/// Classification of one Python string token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringLiteral {
    /// A `str` constant with its decoded value
    Str(String),
    /// A `b"..."` constant
    Bytes,
    /// An f-string (or t-string); never a constant
    Formatted,
}

/// Decode a single string token, prefix and quotes included.
///
/// Returns `None` if the token is not shaped like a string literal.
pub fn parse_string_literal(token: &str) -> Option<StringLiteral> {
    let quote_at = token.find(['\'', '"'])?;
    let prefix = token[..quote_at].to_ascii_lowercase();
    if !prefix.chars().all(|c| matches!(c, 'r' | 'u' | 'b' | 'f' | 't')) {
        return None;
    }

    if prefix.contains('f') || prefix.contains('t') {
        return Some(StringLiteral::Formatted);
    }
    if prefix.contains('b') {
        return Some(StringLiteral::Bytes);
    }

    let quoted = &token[quote_at..];
    let quote = &quoted[..1];
    let triple = quote.repeat(3);
    let delimiter = if quoted.len() >= 6 && quoted.starts_with(&triple) {
        triple.as_str()
    } else {
        quote
    };

    if quoted.len() < delimiter.len() * 2 || !quoted.ends_with(delimiter) {
        return None;
    }
    let body = &quoted[delimiter.len()..quoted.len() - delimiter.len()];

    if prefix.contains('r') {
        Some(StringLiteral::Str(body.to_string()))
    } else {
        Some(StringLiteral::Str(decode_escapes(body)))
    }
}

/// Apply Python escape sequences. Unknown escapes are kept verbatim.
pub fn decode_escapes(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(&next) = chars.get(i) else {
            out.push('\\');
            break;
        };
        i += 1;

        match next {
            // line continuation
            '\n' => {}
            '\r' => {
                if chars.get(i) == Some(&'\n') {
                    i += 1;
                }
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let start = i - 1;
                let mut end = start + 1;
                while end < chars.len() && end < start + 3 && chars[end].is_digit(8) {
                    end += 1;
                }
                let digits: String = chars[start..end].iter().collect();
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
                i = end;
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                match hex_escape(&chars, i, width) {
                    Some(decoded) => {
                        out.push(decoded);
                        i += width;
                    }
                    None => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            // unknown escapes and `\N{NAME}` stay as written
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

fn hex_escape(chars: &[char], start: usize, width: usize) -> Option<char> {
    let digits = chars.get(start..start + width)?;
    if !digits.iter().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digits: String = digits.iter().collect();
    u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
}

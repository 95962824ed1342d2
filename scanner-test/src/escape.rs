use bstr::ByteSlice;

/// Escape the given bytes so that they can be shown on a single line.
///
/// Printable ASCII is kept as is (except for `\`), and everything else is
/// written as `\n`, `\r`, `\t` or `\xNN`.
pub fn escape(bytes: &[u8]) -> String {
    let mut escaped = String::new();
    for &byte in bytes {
        match byte {
            b'\\' => escaped.push_str(r"\\"),
            b'\n' => escaped.push_str(r"\n"),
            b'\r' => escaped.push_str(r"\r"),
            b'\t' => escaped.push_str(r"\t"),
            0x20..=0x7E => escaped.push(char::from(byte)),
            _ => escaped.push_str(&format!(r"\x{:02X}", byte)),
        }
    }
    escaped
}

/// Unescape `\\`, `\n`, `\r`, `\t` and `\xNN` sequences.
///
/// Any other escape sequence, including an incomplete hex escape, is kept
/// verbatim.
pub fn unescape<B: AsRef<[u8]>>(s: B) -> Vec<u8> {
    let s = s.as_ref();
    let mut bytes = Vec::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        if s[i] != b'\\' || i + 1 == s.len() {
            bytes.push(s[i]);
            i += 1;
            continue;
        }
        let simple = match s[i + 1] {
            b'\\' => Some(b'\\'),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            _ => None,
        };
        if let Some(byte) = simple {
            bytes.push(byte);
            i += 2;
        } else if s[i + 1] == b'x' {
            match s.get(i + 2..i + 4).and_then(hex_byte) {
                Some(byte) => {
                    bytes.push(byte);
                    i += 4;
                }
                None => {
                    bytes.extend_from_slice(&s[i..i + 2]);
                    i += 2;
                }
            }
        } else {
            bytes.extend_from_slice(&s[i..i + 2]);
            i += 2;
        }
    }
    bytes
}

fn hex_byte(digits: &[u8]) -> Option<u8> {
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    u8::from_str_radix(digits.to_str().ok()?, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::{escape, unescape};

    #[test]
    fn simple_escapes() {
        assert_eq!(b"\\".to_vec(), unescape(r"\\"));
        assert_eq!(b"a\nb".to_vec(), unescape(r"a\nb"));
        assert_eq!(b"\t\r".to_vec(), unescape(r"\t\r"));
    }

    #[test]
    fn hex() {
        assert_eq!(b"\x00".to_vec(), unescape(r"\x00"));
        assert_eq!(b"\xFFz".to_vec(), unescape(r"\xffz"));
    }

    #[test]
    fn kept_verbatim() {
        assert_eq!(b"\\a".to_vec(), unescape(r"\a"));
        assert_eq!(b"\\xz".to_vec(), unescape(r"\xz"));
        assert_eq!(b"\\xA".to_vec(), unescape(r"\xA"));
        assert_eq!(b"\\x+1".to_vec(), unescape(r"\x+1"));
        assert_eq!(b"a\\".to_vec(), unescape(r"a\"));
    }

    #[test]
    fn escaped() {
        assert_eq!(r"a\\b\n\x00\xFF", escape(b"a\\b\n\x00\xFF"));
        let raw = b"a\\b\n\x00\xFF";
        assert_eq!(raw.to_vec(), unescape(escape(raw)));
    }
}

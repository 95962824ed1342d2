use bstr::ByteSlice;

/// Unescapes `\\`, `\n`, `\r`, `\t`, `\0` and `\xNN` in the given string.
///
/// Any other use of `\` is kept as is, so that `\q` stays two bytes.
pub fn unescape(s: &str) -> Vec<u8> {
    let s = s.as_bytes();
    let mut bytes = Vec::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        if s[i] != b'\\' || i + 1 == s.len() {
            bytes.push(s[i]);
            i += 1;
            continue;
        }
        let escaped = match s[i + 1] {
            b'\\' => b'\\',
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'0' => b'\x00',
            b'x' => match s.get(i + 2..i + 4).and_then(hex) {
                Some(byte) => {
                    bytes.push(byte);
                    i += 4;
                    continue;
                }
                None => {
                    bytes.extend_from_slice(b"\\x");
                    i += 2;
                    continue;
                }
            },
            _ => {
                bytes.extend_from_slice(&s[i..i + 2]);
                i += 2;
                continue;
            }
        };
        bytes.push(escaped);
        i += 2;
    }
    bytes
}

fn hex(digits: &[u8]) -> Option<u8> {
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    u8::from_str_radix(digits.to_str().ok()?, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::unescape;

    #[test]
    fn escapes() {
        assert_eq!(b"a\nb\t\\".to_vec(), unescape(r"a\nb\t\\"));
        assert_eq!(b"\x00\xFF".to_vec(), unescape(r"\0\xFF"));
    }

    #[test]
    fn unknown_escapes_are_kept() {
        assert_eq!(b"\\q".to_vec(), unescape(r"\q"));
        assert_eq!(b"\\xG1".to_vec(), unescape(r"\xG1"));
        assert_eq!(b"end\\".to_vec(), unescape(r"end\"));
    }
}

/*!
Human readable output for the bytes that label transitions.
*/

/// A byte that formats as the character it names.
///
/// Printable ASCII is written as is, except for space, which is quoted as
/// `' '` so that it stays visible in a list of transitions. Everything else
/// is written with the usual escapes (`\n`, `\t`, `\\`, ...) or as an upper
/// case hex escape like `\xFF`.
///
/// Both the `Debug` and `Display` impls produce the same output.
#[derive(Clone, Copy)]
pub struct DebugByte(pub u8);

impl core::fmt::Debug for DebugByte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.0 == b' ' {
            return write!(f, "' '");
        }
        for (i, b) in core::ascii::escape_default(self.0).enumerate() {
            // Only the hex digits of '\xab' come after index 1.
            let ch = if i >= 2 { b.to_ascii_uppercase() } else { b };
            write!(f, "{}", char::from(ch))?;
        }
        Ok(())
    }
}

impl core::fmt::Display for DebugByte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_bytes() {
        assert_eq!("a", format!("{:?}", DebugByte(b'a')));
        assert_eq!("' '", format!("{:?}", DebugByte(b' ')));
        assert_eq!(r"\n", format!("{:?}", DebugByte(b'\n')));
        assert_eq!(r"\\", format!("{:?}", DebugByte(b'\\')));
        assert_eq!(r"\xFF", format!("{:?}", DebugByte(0xFF)));
        assert_eq!(r"\x7F", format!("{}", DebugByte(0x7F)));
    }
}

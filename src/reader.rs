use std::io::{self, BufRead};

/// Read the next line into `buf`, without its line terminator.
///
/// Returns `false` once the end of the stream is reached. The contents of `buf` are replaced, not
/// appended to. Lines are raw bytes, they need not be valid UTF-8.
#[inline]
pub(crate) fn read_line<R: BufRead>(file: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if file.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    strip_line_terminator(buf);
    Ok(true)
}

/// Strip a trailing `\n` or `\r\n` from `line`.
pub(crate) fn strip_line_terminator(line: &mut Vec<u8>) {
    if line.ends_with(b"\n") {
        line.pop();
        if line.ends_with(b"\r") {
            line.pop();
        }
    }
}

/// Parse an atom count line, allowing surrounding whitespace.
pub(crate) fn parse_natoms(line: &[u8]) -> Option<usize> {
    std::str::from_utf8(line).ok()?.trim().parse().ok()
}

pub(crate) fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

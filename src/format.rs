//! Line format of dump files.
//!
//! One record per line, `<key>:<value>\n`, no header and no checksum. The key
//! ends at the first `:`, so keys must not contain it; values may.

use std::{fmt::Display, io};

pub const DELIMITER: char = ':';

pub fn write_record<W, K, V>(w: &mut W, key: &K, value: &V) -> io::Result<()>
where
    W: io::Write + ?Sized,
    K: Display + ?Sized,
    V: Display + ?Sized,
{
    writeln!(w, "{key}{DELIMITER}{value}")
}

/// Splits a line into key and value text.
///
/// Returns `None` for an empty line, a line without delimiter, or a line
/// whose key or value is empty. A trailing `\n` or `\r\n` is ignored.
pub fn decode_record(line: &str) -> Option<(&str, &str)> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return None;
    }

    let (key, value) = line.split_once(DELIMITER)?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Whether `key`/`value` text would be read back as the same record.
pub(crate) fn is_lossless(key: &str, value: &str) -> bool {
    !key.is_empty()
        && !value.is_empty()
        && !key.contains(DELIMITER)
        && !key.contains('\n')
        && !value.contains('\n')
        && !value.ends_with('\r')
}

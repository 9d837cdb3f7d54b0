//! Digests and encodings used to sign FiltimPay payloads

use crate::Result;
use base64::{engine::general_purpose, Engine as _};
use md5::Md5;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

/// JSON serialization matching PHP's `json_encode` defaults
pub mod json {
    use super::*;
    use serde_json::ser::Formatter;
    use std::io;

    /// Escapes `/` as `\/` and every non-ASCII character as `\uXXXX`
    /// UTF-16 code units. Everything else is plain serde_json output.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PhpFormatter;

    impl Formatter for PhpFormatter {
        fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
        where
            W: ?Sized + io::Write,
        {
            let mut units = [0u16; 2];
            for ch in fragment.chars() {
                if ch == '/' {
                    writer.write_all(b"\\/")?;
                } else if ch.is_ascii() {
                    writer.write_all(&[ch as u8])?;
                } else {
                    for unit in ch.encode_utf16(&mut units) {
                        write!(writer, "\\u{:04x}", unit)?;
                    }
                }
            }
            Ok(())
        }
    }

    /// Serialize a value the way the processor's reference client does
    pub fn to_string<T>(value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PhpFormatter);
        value.serialize(&mut ser)?;
        // The formatter only ever emits ASCII.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Standard padded base64
pub fn base64_encode(input: impl AsRef<[u8]>) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Inverse of [`base64_encode`]
pub fn base64_decode(input: &str) -> Result<Vec<u8>> {
    Ok(general_purpose::STANDARD.decode(input)?)
}

/// Lowercase hex MD5 digest
pub fn md5_hex(input: impl AsRef<[u8]>) -> String {
    hex::encode(Md5::digest(input.as_ref()))
}

/// Base64 of the raw SHA-1 digest of `input`
pub fn str_to_sign(input: &str) -> String {
    base64_encode(Sha1::digest(input.as_bytes()))
}

/// Percent-encode every byte that is not an ASCII letter or digit
pub fn query_encode(input: &str) -> String {
    utf8_percent_encode(input, NON_ALPHANUMERIC).to_string()
}

/// Build `k1=v1&k2=v2` with both keys and values query-encoded
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", query_encode(key), query_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Constant-time comparison of two byte slices. Only the length check
/// short-circuits.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Decodes a runtime payload as text.
///
/// Exactly one trailing NUL byte is stripped when present; some runtimes
/// NUL-terminate the strings in their management object model.
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_value(bytes: &[u8]) -> String {
    let bytes = match bytes.split_last() {
        Some((0, rest)) => rest,
        _ => bytes,
    };
    String::from_utf8_lossy(bytes).into_owned()
}

/// Encodes an outgoing value as plain UTF-8, without a terminator
pub fn encode_value(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}

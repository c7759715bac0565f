//! List <-> column codec.
//!
//! Skills, locations and tags are stored as a single comma-delimited text
//! column. Encoding refuses any value that would not survive a decode, so
//! `decode_list(&encode_list(xs)?) == xs` holds for everything we persist.

pub const DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("value at position {index} is empty")]
    EmptyValue { index: usize },

    #[error("value '{value}' must not contain ','")]
    ContainsDelimiter { value: String },
}

/// Check that every value can round-trip through the column encoding.
pub fn validate_list<S: AsRef<str>>(values: &[S]) -> Result<(), CodecError> {
    for (index, value) in values.iter().enumerate() {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(CodecError::EmptyValue { index });
        }
        if value.contains(DELIMITER) {
            return Err(CodecError::ContainsDelimiter { value: value.to_string() });
        }
    }
    Ok(())
}

pub fn encode_list<S: AsRef<str>>(values: &[S]) -> Result<String, CodecError> {
    validate_list(values)?;
    let parts: Vec<&str> = values.iter().map(|v| v.as_ref()).collect();
    let separator = DELIMITER.to_string();
    Ok(parts.join(separator.as_str()))
}

pub fn decode_list(encoded: &str) -> Vec<String> {
    if encoded.is_empty() {
        return Vec::new();
    }
    encoded.split(DELIMITER).map(str::to_string).collect()
}

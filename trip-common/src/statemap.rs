use std::collections::BTreeMap;

use thiserror::Error;

/// Enumeration of errors for operations on the state-map encoding.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("{0:?} is not a key:value pair")]
    InvalidPair(String),
    #[error("{0:?} is not a valid integer")]
    InvalidInteger(String),
}

/// Parse the compact `"k1:v1,k2:v2"` status encoding into a map.
///
/// Every comma-separated element must split into exactly two integer tokens.
/// The empty string is not a valid encoding: it yields one empty element,
/// which fails the pair check.
pub fn parse(text: &str) -> Result<BTreeMap<i64, i64>, FormatError> {
    let mut state_map = BTreeMap::new();

    for pair in text.split(',') {
        let mut tokens = pair.split(':');

        let (Some(key), Some(value), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(FormatError::InvalidPair(pair.to_owned()));
        };

        let key = key
            .parse::<i64>()
            .map_err(|_| FormatError::InvalidInteger(key.to_owned()))?;
        let value = value
            .parse::<i64>()
            .map_err(|_| FormatError::InvalidInteger(value.to_owned()))?;

        state_map.insert(key, value);
    }

    Ok(state_map)
}

/// Serialize a state map back to its text encoding, keys ascending.
///
/// Deterministic regardless of how the map was built; re-encoding a parsed
/// map reorders pairs that arrived unsorted.
pub fn serialize(state_map: &BTreeMap<i64, i64>) -> String {
    let pairs: Vec<String> = state_map.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();

    pairs.join(",")
}

/// Join an integer sequence into the comma-delimited form stored in plan
/// records.
pub fn join_ints(values: &[i64]) -> String {
    let tokens: Vec<String> = values.iter().map(|v| v.to_string()).collect();

    tokens.join(",")
}

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("{value} is out of range (choose a number between 0 and {max})")]
    OutOfRange { value: i64, max: usize },

    #[error("no cities are loaded")]
    NothingLoaded,
}

/// Parse a non-negative integer strictly below `upper`.
///
/// Used for location ids and nearest-city counts alike, both of which must
/// lie in `[0, count)`.
pub fn parse_below(input: &str, upper: usize) -> Result<usize, InputError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;

    if upper == 0 {
        return Err(InputError::NothingLoaded);
    }
    if value < 0 || value as u64 >= upper as u64 {
        return Err(InputError::OutOfRange {
            value,
            max: upper - 1,
        });
    }
    Ok(value as usize)
}

/// Whole miles, truncated toward zero.
pub fn whole_miles(distance: f64) -> i64 {
    distance.trunc() as i64
}

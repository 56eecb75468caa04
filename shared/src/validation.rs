use crate::error::VoteError;
use crate::models::{VoteAction, VoteOption, VoteOptions};

pub const RESET_ACTION: &str = "reset";
pub const MAX_LABEL_LENGTH: usize = 64;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("Empty option label")]
    Empty,
    #[error("Option label exceeds maximum length of {MAX_LABEL_LENGTH}: {0}")]
    TooLong(String),
    #[error("Option label {0:?} is reserved")]
    Reserved(String),
    #[error("Duplicate option label: {0}")]
    Duplicate(String),
}

pub fn validate_label(label: &str) -> Result<VoteOption, LabelError> {
    let label = label.trim();
    if label.is_empty() { return Err(LabelError::Empty); }
    if label.chars().count() > MAX_LABEL_LENGTH { return Err(LabelError::TooLong(label.to_string())); }
    if label == RESET_ACTION { return Err(LabelError::Reserved(label.to_string())); }
    Ok(VoteOption::new(label))
}

pub fn validate_options(first: &str, second: &str) -> Result<VoteOptions, LabelError> {
    let first = validate_label(first)?;
    let second = validate_label(second)?;
    if first == second {
        return Err(LabelError::Duplicate(second.label().to_string()));
    }
    Ok(VoteOptions::new(first, second))
}

/// Maps a submitted `vote` value onto an action. Only the configured keys and
/// `reset` are accepted; matching is exact.
pub fn parse_vote(value: Option<&str>, options: &VoteOptions) -> Result<VoteAction, VoteError> {
    let Some(value) = value else {
        return Err(VoteError::BadRequest("missing vote field".into()));
    };

    if value == RESET_ACTION {
        return Ok(VoteAction::Reset);
    }

    options
        .find(value)
        .cloned()
        .map(VoteAction::Increment)
        .ok_or_else(|| VoteError::BadRequest(value.to_string()))
}

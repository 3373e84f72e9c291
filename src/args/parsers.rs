use super::types::{AgentList, PositiveU32, PositiveU64};
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_agent_list(s: &str) -> AppResult<AgentList> {
    s.parse::<AgentList>().map_err(AppError::from)
}

pub(super) fn parse_positive_u32(s: &str) -> AppResult<PositiveU32> {
    s.parse::<PositiveU32>().map_err(AppError::from)
}

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The verification-code schemes a request can be challenged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeType {
    Sms,
    Customize,
    Selection,
    Track,
    Slider,
    Image,
}

#[derive(Debug, Error, PartialEq)]
pub enum CodeTypeError {
    #[error("Unknown verification code type: {0}")]
    Unknown(String),
}

impl CodeType {
    /// Highest priority first. When several types guard the same URI the
    /// first one in this list wins.
    pub const PRIORITY: [CodeType; 6] = [
        CodeType::Sms,
        CodeType::Customize,
        CodeType::Selection,
        CodeType::Track,
        CodeType::Slider,
        CodeType::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::Sms => "sms",
            CodeType::Customize => "customize",
            CodeType::Selection => "selection",
            CodeType::Track => "track",
            CodeType::Slider => "slider",
            CodeType::Image => "image",
        }
    }

    /// Position in [`CodeType::PRIORITY`]; lower is stronger.
    pub fn rank(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|t| t == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeType {
    type Err = CodeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or(CodeTypeError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(CodeType::Sms.rank() < CodeType::Customize.rank());
        assert!(CodeType::Customize.rank() < CodeType::Selection.rank());
        assert!(CodeType::Selection.rank() < CodeType::Track.rank());
        assert!(CodeType::Track.rank() < CodeType::Slider.rank());
        assert!(CodeType::Slider.rank() < CodeType::Image.rank());
    }

    #[test]
    fn test_parse_code_type() {
        assert_eq!("image".parse::<CodeType>(), Ok(CodeType::Image));
        assert_eq!(" SMS ".parse::<CodeType>(), Ok(CodeType::Sms));
        assert_eq!(
            "captcha".parse::<CodeType>(),
            Err(CodeTypeError::Unknown("captcha".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for code_type in CodeType::PRIORITY {
            assert_eq!(code_type.to_string().parse::<CodeType>(), Ok(code_type));
        }
    }
}

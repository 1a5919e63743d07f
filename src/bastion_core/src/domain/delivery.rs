use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use thiserror::Error;

use crate::domain::challenge::ChallengeCode;

/// What the client receives after a challenge is issued.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryPayload {
    #[serde(flatten)]
    pub artifact: Artifact,
    /// Seconds until the challenge expires.
    pub expire_in: u64,
}

impl DeliveryPayload {
    pub fn new(artifact: Artifact, expire_in: u64) -> Self {
        Self {
            artifact,
            expire_in,
        }
    }
}

/// Client-visible part of a challenge.
///
/// Never carries the answer: no code, no slider X offset and no trajectory
/// coordinates. Images are base64 encoded PNGs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Artifact {
    Image {
        image: String,
    },
    Sms {
        mobile: String,
    },
    Slider {
        token: String,
        background: String,
        piece: String,
        /// Row the piece is drawn on; the piece slides horizontally.
        y: i32,
        piece_width: u32,
        piece_height: u32,
    },
    Track {
        image: String,
        points: usize,
    },
    Selection {
        image: String,
        prompt: Vec<String>,
    },
    Customize,
}

/// A message that leaves through a delivery channel instead of the HTTP
/// response.
#[derive(Debug, Clone)]
pub enum OutOfBandMessage {
    Sms { mobile: Mobile, code: ChallengeCode },
    /// Routing is up to the deployment's channel.
    Custom { code: ChallengeCode },
}

/// Accepted when no deployment-specific pattern is configured.
pub const DEFAULT_MOBILE_PATTERN: &str = r"^\+?[0-9]{6,15}$";

#[derive(Debug, Error, PartialEq)]
pub enum MobileError {
    #[error("Invalid mobile number")]
    Invalid,
}

/// A validated mobile number.
#[derive(Debug, Clone)]
pub struct Mobile(Secret<String>);

impl Mobile {
    /// Spaces and dashes are stripped before matching against `pattern`.
    pub fn parse(mobile: Secret<String>, pattern: &Regex) -> Result<Self, MobileError> {
        let normalized: String = mobile
            .expose_secret()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        if !pattern.is_match(&normalized) {
            return Err(MobileError::Invalid);
        }
        Ok(Self(Secret::new(normalized)))
    }

    /// Number with all but the last four digits hidden.
    pub fn masked(&self) -> String {
        let number = self.0.expose_secret();
        let visible = number.len().saturating_sub(4);
        number
            .char_indices()
            .map(|(i, c)| if i < visible && c != '+' { '*' } else { c })
            .collect()
    }
}

impl AsRef<Secret<String>> for Mobile {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

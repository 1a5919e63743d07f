use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::domain::code_type::CodeType;

/// Maximum horizontal distance (exclusive) between the stored slider target
/// and the submitted position.
pub const SLIDER_TOLERANCE: i32 = 2;

/// Radius in pixels a trajectory sample must come within to visit a waypoint.
pub const TRACK_TOLERANCE: i32 = 12;

/// A server-issued secret plus the metadata needed to validate an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    code_type: CodeType,
    secret: ChallengeSecret,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    reusable: bool,
    second_check_pending: bool,
    version: u64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ChallengeBuildError {
    #[error("Challenge time to live must be positive")]
    NonPositiveTtl,
    #[error("Challenge time to live is out of range")]
    TtlOutOfRange,
}

impl Challenge {
    pub fn new(
        code_type: CodeType,
        secret: ChallengeSecret,
        ttl: Duration,
    ) -> Result<Self, ChallengeBuildError> {
        Self::issued_at(code_type, secret, ttl, Utc::now())
    }

    pub fn issued_at(
        code_type: CodeType,
        secret: ChallengeSecret,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, ChallengeBuildError> {
        let expires_at = expiry_after(now, ttl)?;

        Ok(Self {
            code_type,
            secret,
            created_at: now,
            expires_at,
            reusable: false,
            second_check_pending: false,
            version: 0,
        })
    }

    /// Reusable challenges survive a mismatching answer.
    pub fn with_reusable(mut self, reusable: bool) -> Self {
        self.reusable = reusable;
        self
    }

    pub fn code_type(&self) -> CodeType {
        self.code_type
    }

    pub fn secret(&self) -> &ChallengeSecret {
        &self.secret
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_reusable(&self) -> bool {
        self.reusable
    }

    pub fn second_check_pending(&self) -> bool {
        self.second_check_pending
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time left before expiry, `None` once expired.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Option<Duration> {
        (self.expires_at - now).to_std().ok().filter(|d| !d.is_zero())
    }

    /// Slider phase one passed: from now on only `token` is accepted.
    ///
    /// The challenge becomes single-use and gets a fresh, short expiry.
    pub fn begin_second_check(
        &mut self,
        token: ChallengeCode,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<(), ChallengeBuildError> {
        self.expires_at = expiry_after(now, ttl)?;
        if let ChallengeSecret::Slider(target) = &mut self.secret {
            target.token = token;
        } else {
            self.secret = ChallengeSecret::Code(token);
        }
        self.second_check_pending = true;
        self.reusable = false;
        self.version = self.version.wrapping_add(1);
        Ok(())
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, ChallengeBuildError> {
    if ttl.is_zero() {
        return Err(ChallengeBuildError::NonPositiveTtl);
    }
    let delta = chrono::Duration::from_std(ttl).map_err(|_| ChallengeBuildError::TtlOutOfRange)?;
    now.checked_add_signed(delta)
        .ok_or(ChallengeBuildError::TtlOutOfRange)
}

/// The comparison value of a challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ChallengeSecret {
    Code(ChallengeCode),
    Slider(SliderTarget),
    Track(TrackPath),
}

/// An opaque code the client must echo back.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeCode(Secret<String>);

impl ChallengeCode {
    pub fn new(code: String) -> Self {
        Self(Secret::new(code))
    }

    pub fn matches(&self, submitted: &str, ignore_case: bool) -> bool {
        let expected = self.0.expose_secret();
        if ignore_case {
            expected.eq_ignore_ascii_case(submitted)
        } else {
            expected == submitted
        }
    }
}

impl AsRef<Secret<String>> for ChallengeCode {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl Serialize for ChallengeCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.expose_secret())
    }
}

/// Where the slider piece has to be dropped, plus the token bound to the
/// current phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderTarget {
    pub x: i32,
    pub y: i32,
    pub token: ChallengeCode,
}

impl SliderTarget {
    /// `y` must match exactly, `x` within [`SLIDER_TOLERANCE`].
    pub fn matches_position(&self, x: i32, y: i32) -> bool {
        self.y == y && (self.x - x).abs() < SLIDER_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn within(&self, other: &Point, radius: i32) -> bool {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy <= i64::from(radius) * i64::from(radius)
    }
}

/// Ordered waypoints of a trajectory challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPath {
    pub points: Vec<Point>,
}

impl TrackPath {
    /// True when the samples pass every waypoint, in order, within
    /// [`TRACK_TOLERANCE`].
    pub fn visited_in_order(&self, samples: &[Point]) -> bool {
        let mut waypoints = self.points.iter().peekable();
        for sample in samples {
            match waypoints.peek() {
                Some(next) if sample.within(next, TRACK_TOLERANCE) => {
                    waypoints.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        !self.points.is_empty() && waypoints.peek().is_none()
    }
}

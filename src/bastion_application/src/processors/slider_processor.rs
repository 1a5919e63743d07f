use std::time::Duration;

use async_trait::async_trait;
use bastion_core::{
    Challenge, ChallengeCode, ChallengeError, ChallengeKey, ChallengeSecret, ChallengeStore,
    CodeGenerator, CodeProcessor, CodeType, DeliveryPayload, OwnerKey, RequestContext,
    SliderTarget, ValidationOutcome,
};
use uuid::Uuid;

use super::lifecycle::{ChallengePolicy, Lifecycle, generation_error};

/// Request parameter names read by the slider processor.
#[derive(Debug, Clone)]
pub struct SliderParams {
    pub token: String,
    pub x: String,
    pub y: String,
}

impl Default for SliderParams {
    fn default() -> Self {
        Self {
            token: "sliderToken".to_string(),
            x: "x".to_string(),
            y: "y".to_string(),
        }
    }
}

/// Two-phase slider verification.
///
/// Phase one checks the dropped position together with the issued token. On
/// success the challenge is re-armed with a fresh token and a short expiry,
/// and only that token can complete phase two.
pub struct SliderCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    generator: G,
    lifecycle: Lifecycle<S>,
    params: SliderParams,
    second_check_ttl: Duration,
}

impl<S, G> SliderCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    pub fn new(
        store: S,
        generator: G,
        policy: ChallengePolicy,
        params: SliderParams,
        second_check_ttl: Duration,
    ) -> Self {
        Self {
            generator,
            lifecycle: Lifecycle::new(store, policy),
            params,
            second_check_ttl,
        }
    }

    async fn second_check(
        &self,
        key: &ChallengeKey,
        target: &SliderTarget,
        ctx: &RequestContext,
    ) -> Result<ValidationOutcome, ChallengeError> {
        let Some(token) = ctx.param(&self.params.token) else {
            self.lifecycle.discard(key).await;
            return Err(ChallengeError::malformed(&self.params.token));
        };
        if !target.token.matches(token, false) {
            self.lifecycle.discard(key).await;
            return Err(ChallengeError::Mismatch);
        }

        self.lifecycle.consume(key).await?;
        Ok(ValidationOutcome::Passed)
    }

    async fn first_check(
        &self,
        key: &ChallengeKey,
        challenge: &Challenge,
        target: &SliderTarget,
        ctx: &RequestContext,
    ) -> Result<ValidationOutcome, ChallengeError> {
        let submitted = match self.read_position(ctx) {
            Ok(submitted) => submitted,
            Err(e) => {
                self.lifecycle.discard(key).await;
                return Err(e);
            }
        };
        let (token, x, y) = submitted;

        if !target.token.matches(token, false) || !target.matches_position(x, y) {
            tracing::debug!("Slider position rejected");
            return Err(self
                .lifecycle
                .reject(key, challenge, ChallengeError::Mismatch)
                .await);
        }

        let fresh_token = Uuid::new_v4().simple().to_string();
        let mut armed = challenge.clone();
        armed
            .begin_second_check(
                ChallengeCode::new(fresh_token.clone()),
                self.second_check_ttl,
                chrono::Utc::now(),
            )
            .map_err(|e| ChallengeError::GenerationFailed(e.to_string()))?;

        // Losing the race means another request already moved this challenge on.
        let swapped = self
            .lifecycle
            .compare_and_set(key, challenge.version(), armed, self.second_check_ttl)
            .await?;
        if !swapped {
            return Err(ChallengeError::NotFound);
        }

        Ok(ValidationOutcome::SecondCheckRequired { token: fresh_token })
    }

    fn read_position<'a>(
        &self,
        ctx: &'a RequestContext,
    ) -> Result<(&'a str, i32, i32), ChallengeError> {
        let token = ctx
            .param(&self.params.token)
            .ok_or_else(|| ChallengeError::malformed(&self.params.token))?;
        let x = parse_coordinate(ctx, &self.params.x)?;
        let y = parse_coordinate(ctx, &self.params.y)?;
        Ok((token, x, y))
    }
}

fn parse_coordinate(ctx: &RequestContext, name: &str) -> Result<i32, ChallengeError> {
    ctx.param(name)
        .and_then(|value| value.parse::<i32>().ok())
        .ok_or_else(|| ChallengeError::malformed(name))
}

#[async_trait]
impl<S, G> CodeProcessor for SliderCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    fn code_type(&self) -> CodeType {
        CodeType::Slider
    }

    #[tracing::instrument(name = "SliderCodeProcessor::issue", skip_all)]
    async fn issue(
        &self,
        owner: &OwnerKey,
        ctx: &RequestContext,
    ) -> Result<DeliveryPayload, ChallengeError> {
        let generated = self.generator.generate(ctx).map_err(generation_error)?;
        self.lifecycle
            .persist(CodeType::Slider, owner, generated, None)
            .await
    }

    #[tracing::instrument(name = "SliderCodeProcessor::validate", skip_all)]
    async fn validate(
        &self,
        owner: &OwnerKey,
        ctx: &RequestContext,
    ) -> Result<ValidationOutcome, ChallengeError> {
        let key = ChallengeKey::new(CodeType::Slider, owner.clone());
        let challenge = self.lifecycle.load(&key).await?;

        let ChallengeSecret::Slider(target) = challenge.secret() else {
            self.lifecycle.discard(&key).await;
            return Err(ChallengeError::Mismatch);
        };

        if challenge.second_check_pending() {
            self.second_check(&key, target, ctx).await
        } else {
            self.first_check(&key, &challenge, target, ctx).await
        }
    }
}

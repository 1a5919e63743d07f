use async_trait::async_trait;
use bastion_core::{
    ChallengeError, ChallengeKey, ChallengeSecret, ChallengeStore, CodeGenerator, CodeProcessor,
    CodeType, DeliveryPayload, OwnerKey, Point, RequestContext, ValidationOutcome,
};

use super::lifecycle::{ChallengePolicy, Lifecycle, generation_error};

/// Trajectory verification: the client submits the sampled pointer path as
/// `x:y,x:y,...` and it has to pass every waypoint in order.
pub struct TrackCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    generator: G,
    lifecycle: Lifecycle<S>,
    param_name: String,
}

impl<S, G> TrackCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    pub fn new(store: S, generator: G, policy: ChallengePolicy, param_name: impl Into<String>) -> Self {
        Self {
            generator,
            lifecycle: Lifecycle::new(store, policy),
            param_name: param_name.into(),
        }
    }
}

/// Parses `x:y,x:y,...`; `None` on any malformed sample.
pub fn parse_track(raw: &str) -> Option<Vec<Point>> {
    raw.split(',')
        .map(|sample| {
            let (x, y) = sample.trim().split_once(':')?;
            Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
        })
        .collect()
}

#[async_trait]
impl<S, G> CodeProcessor for TrackCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    fn code_type(&self) -> CodeType {
        CodeType::Track
    }

    #[tracing::instrument(name = "TrackCodeProcessor::issue", skip_all)]
    async fn issue(
        &self,
        owner: &OwnerKey,
        ctx: &RequestContext,
    ) -> Result<DeliveryPayload, ChallengeError> {
        let generated = self.generator.generate(ctx).map_err(generation_error)?;
        self.lifecycle
            .persist(CodeType::Track, owner, generated, None)
            .await
    }

    #[tracing::instrument(name = "TrackCodeProcessor::validate", skip_all)]
    async fn validate(
        &self,
        owner: &OwnerKey,
        ctx: &RequestContext,
    ) -> Result<ValidationOutcome, ChallengeError> {
        let key = ChallengeKey::new(CodeType::Track, owner.clone());
        let challenge = self.lifecycle.load(&key).await?;

        let Some(samples) = ctx.param(&self.param_name).and_then(parse_track) else {
            self.lifecycle.discard(&key).await;
            return Err(ChallengeError::malformed(&self.param_name));
        };

        let passed = match challenge.secret() {
            ChallengeSecret::Track(path) => path.visited_in_order(&samples),
            _ => false,
        };
        if !passed {
            return Err(self
                .lifecycle
                .reject(&key, &challenge, ChallengeError::Mismatch)
                .await);
        }

        self.lifecycle.consume(&key).await?;
        Ok(ValidationOutcome::Passed)
    }
}

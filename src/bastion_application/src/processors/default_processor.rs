use std::sync::Arc;

use async_trait::async_trait;
use bastion_core::{
    ChallengeError, ChallengeKey, ChallengeSecret, ChallengeStore, CodeGenerator, CodeProcessor,
    CodeType, DeliveryChannel, DeliveryPayload, OwnerKey, RequestContext, ValidationOutcome,
};

use super::lifecycle::{ChallengePolicy, Lifecycle, generation_error};

/// Processor for plain code challenges: image, SMS, selection and custom.
///
/// The client echoes the code in `param_name`.
pub struct DefaultCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    generator: G,
    lifecycle: Lifecycle<S>,
    param_name: String,
    ignore_case: bool,
    delivery: Option<Arc<dyn DeliveryChannel>>,
}

impl<S, G> DefaultCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    pub fn new(store: S, generator: G, policy: ChallengePolicy, param_name: impl Into<String>) -> Self {
        Self {
            generator,
            lifecycle: Lifecycle::new(store, policy),
            param_name: param_name.into(),
            ignore_case: false,
            delivery: None,
        }
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_delivery(mut self, channel: Arc<dyn DeliveryChannel>) -> Self {
        self.delivery = Some(channel);
        self
    }
}

#[async_trait]
impl<S, G> CodeProcessor for DefaultCodeProcessor<S, G>
where
    S: ChallengeStore,
    G: CodeGenerator,
{
    fn code_type(&self) -> CodeType {
        self.generator.code_type()
    }

    #[tracing::instrument(name = "DefaultCodeProcessor::issue", skip_all, fields(code_type = %self.code_type()))]
    async fn issue(
        &self,
        owner: &OwnerKey,
        ctx: &RequestContext,
    ) -> Result<DeliveryPayload, ChallengeError> {
        let generated = self.generator.generate(ctx).map_err(generation_error)?;
        self.lifecycle
            .persist(self.code_type(), owner, generated, self.delivery.as_deref())
            .await
    }

    #[tracing::instrument(name = "DefaultCodeProcessor::validate", skip_all, fields(code_type = %self.code_type()))]
    async fn validate(
        &self,
        owner: &OwnerKey,
        ctx: &RequestContext,
    ) -> Result<ValidationOutcome, ChallengeError> {
        let key = ChallengeKey::new(self.code_type(), owner.clone());
        let challenge = self.lifecycle.load(&key).await?;

        let Some(submitted) = ctx.param(&self.param_name) else {
            self.lifecycle.discard(&key).await;
            return Err(ChallengeError::malformed(&self.param_name));
        };

        let matched = match challenge.secret() {
            ChallengeSecret::Code(code) => code.matches(submitted, self.ignore_case),
            _ => false,
        };
        if !matched {
            tracing::debug!("Verification code mismatch");
            return Err(self
                .lifecycle
                .reject(&key, &challenge, ChallengeError::Mismatch)
                .await);
        }

        self.lifecycle.consume(&key).await?;
        Ok(ValidationOutcome::Passed)
    }
}

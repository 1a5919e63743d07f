use bastion_core::{
    Artifact, ChallengeCode, ChallengeSecret, CodeGenerator, CodeType, GenerateError,
    GeneratedChallenge, Mobile, OutOfBandMessage, RequestContext,
};
use regex::Regex;
use secrecy::Secret;

use super::raster::random_digits;

/// Numeric code sent to the mobile number in the request.
#[derive(Debug, Clone)]
pub struct SmsCodeGenerator {
    length: usize,
    mobile_param: String,
    mobile_pattern: Regex,
}

impl SmsCodeGenerator {
    pub fn new(
        length: usize,
        mobile_param: impl Into<String>,
        mobile_pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            length: length.max(1),
            mobile_param: mobile_param.into(),
            mobile_pattern: Regex::new(mobile_pattern)?,
        })
    }
}

impl CodeGenerator for SmsCodeGenerator {
    fn code_type(&self) -> CodeType {
        CodeType::Sms
    }

    fn generate(&self, ctx: &RequestContext) -> Result<GeneratedChallenge, GenerateError> {
        let mobile = ctx
            .param(&self.mobile_param)
            .ok_or_else(|| GenerateError::InvalidInput(self.mobile_param.clone()))?;
        let mobile = Mobile::parse(Secret::new(mobile.to_string()), &self.mobile_pattern)
            .map_err(|_| GenerateError::InvalidInput(self.mobile_param.clone()))?;

        let code = ChallengeCode::new(random_digits(&mut rand::rng(), self.length));
        let artifact = Artifact::Sms {
            mobile: mobile.masked(),
        };

        Ok(
            GeneratedChallenge::new(ChallengeSecret::Code(code.clone()), artifact)
                .with_out_of_band(OutOfBandMessage::Sms { mobile, code }),
        )
    }
}

use bastion_core::{
    Artifact, ChallengeCode, ChallengeSecret, CodeGenerator, CodeType, GenerateError,
    GeneratedChallenge, OutOfBandMessage, RequestContext,
};

use super::raster::random_digits;

/// Numeric code handed to the deployment's own delivery channel.
#[derive(Debug, Clone)]
pub struct CustomizeCodeGenerator {
    length: usize,
}

impl CustomizeCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl CodeGenerator for CustomizeCodeGenerator {
    fn code_type(&self) -> CodeType {
        CodeType::Customize
    }

    fn generate(&self, _ctx: &RequestContext) -> Result<GeneratedChallenge, GenerateError> {
        let code = ChallengeCode::new(random_digits(&mut rand::rng(), self.length));
        Ok(
            GeneratedChallenge::new(ChallengeSecret::Code(code.clone()), Artifact::Customize)
                .with_out_of_band(OutOfBandMessage::Custom { code }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_delivered_out_of_band() {
        let generated = CustomizeCodeGenerator::new(6)
            .generate(&RequestContext::default())
            .unwrap();
        assert!(matches!(generated.artifact, Artifact::Customize));
        assert!(matches!(
            generated.out_of_band,
            Some(OutOfBandMessage::Custom { .. })
        ));
    }
}

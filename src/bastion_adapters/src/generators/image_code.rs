use bastion_core::{
    Artifact, ChallengeCode, ChallengeSecret, CodeGenerator, CodeType, GenerateError,
    GeneratedChallenge, RequestContext,
};
use rand::Rng;

use super::raster::{Canvas, glyph_scale, glyph_size, random_color, random_digits};

/// Distorted digit image.
#[derive(Debug, Clone)]
pub struct ImageCodeGenerator {
    length: usize,
    width: u32,
    height: u32,
}

impl ImageCodeGenerator {
    pub fn new(length: usize, width: u32, height: u32) -> Self {
        Self {
            length: length.max(1),
            width,
            height,
        }
    }

    fn render(&self, code: &str) -> Result<String, GenerateError> {
        let mut rng = rand::rng();
        let mut canvas = Canvas::new(self.width, self.height, random_color(&mut rng, 225, 250));
        canvas.speckle(&mut rng, self.width * self.height / 12);
        canvas.scribble(&mut rng, 6);

        let scale = glyph_scale(code.len(), self.width, self.height);
        let (glyph_width, glyph_height) = glyph_size(scale);
        let cell = (self.width / code.len() as u32).max(glyph_width);
        let slack_x = cell.saturating_sub(glyph_width) as i32;
        let slack_y = self.height.saturating_sub(glyph_height) as i32;

        for (i, digit) in code.chars().enumerate() {
            let x = (i as u32 * cell) as i32 + rng.random_range(0..=slack_x / 2) + slack_x / 4;
            let y = rng.random_range(0..=slack_y.max(0));
            canvas.draw_digit(digit, x, y, scale, random_color(&mut rng, 20, 110));
        }
        canvas.scribble(&mut rng, 3);

        canvas.to_base64_png()
    }
}

impl CodeGenerator for ImageCodeGenerator {
    fn code_type(&self) -> CodeType {
        CodeType::Image
    }

    fn generate(&self, _ctx: &RequestContext) -> Result<GeneratedChallenge, GenerateError> {
        let code = random_digits(&mut rand::rng(), self.length);
        let image = self.render(&code)?;

        Ok(GeneratedChallenge::new(
            ChallengeSecret::Code(ChallengeCode::new(code)),
            Artifact::Image { image },
        ))
    }
}

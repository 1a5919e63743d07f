use bastion_core::{
    Artifact, ChallengeCode, ChallengeSecret, CodeGenerator, CodeType, GenerateError,
    GeneratedChallenge, RequestContext, SliderTarget,
};
use image::Rgba;
use rand::Rng;

use super::raster::{Canvas, random_color};

const MARGIN: u32 = 6;

/// Background with a darkened hole and the matching piece the client drags
/// into it.
#[derive(Debug, Clone)]
pub struct SliderCodeGenerator {
    width: u32,
    height: u32,
    piece_size: u32,
}

impl SliderCodeGenerator {
    pub fn new(width: u32, height: u32, piece_size: u32) -> Self {
        let piece_size = piece_size.max(8);
        Self {
            width: width.max(piece_size * 3 + MARGIN * 2),
            height: height.max(piece_size + MARGIN * 2),
            piece_size,
        }
    }

    fn background<R: Rng + ?Sized>(&self, rng: &mut R) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height, random_color(rng, 150, 210));
        let band = (self.height / 8).max(1);
        for row in 0..8 {
            canvas.fill_rect(
                0,
                (row * band) as i32,
                self.width,
                band,
                random_color(rng, 120, 230),
            );
        }
        for _ in 0..12 {
            let cx = rng.random_range(0..self.width) as i32;
            let cy = rng.random_range(0..self.height) as i32;
            let radius = rng.random_range(4..(self.piece_size as i32).max(5));
            canvas.draw_disc(cx, cy, radius, random_color(rng, 60, 240));
        }
        canvas.scribble(rng, 10);
        canvas
    }
}

impl CodeGenerator for SliderCodeGenerator {
    fn code_type(&self) -> CodeType {
        CodeType::Slider
    }

    fn generate(&self, _ctx: &RequestContext) -> Result<GeneratedChallenge, GenerateError> {
        let mut rng = rand::rng();
        let size = self.piece_size;

        // The hole never overlaps the piece's starting column at the left edge.
        let x = rng.random_range(size + MARGIN..=self.width - size - MARGIN);
        let y = rng.random_range(MARGIN..=self.height - size - MARGIN);

        let mut background = self.background(&mut rng);
        let mut piece = background.crop(x, y, size, size);
        piece.outline(Rgba([255, 255, 255, 255]));
        background.shade_rect(x, y, size, size, 0.45);

        let token = uuid::Uuid::new_v4().simple().to_string();
        let target = SliderTarget {
            x: x as i32,
            y: y as i32,
            token: ChallengeCode::new(token.clone()),
        };
        let artifact = Artifact::Slider {
            token,
            background: background.to_base64_png()?,
            piece: piece.to_base64_png()?,
            y: target.y,
            piece_width: size,
            piece_height: size,
        };

        Ok(GeneratedChallenge::new(
            ChallengeSecret::Slider(target),
            artifact,
        ))
    }
}

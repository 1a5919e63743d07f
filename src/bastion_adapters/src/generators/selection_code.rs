use bastion_core::{
    Artifact, ChallengeCode, ChallengeSecret, CodeGenerator, CodeType, GenerateError,
    GeneratedChallenge, RequestContext,
};
use image::Rgba;
use rand::{Rng, seq::SliceRandom};

use super::raster::{Canvas, glyph_size, random_color};

const GRID: u32 = 3;
const CELL: u32 = 60;

/// A 3x3 grid of shuffled digits; the client clicks the prompted digits in
/// order and submits the cell indices, row-major from 0.
#[derive(Debug, Clone)]
pub struct SelectionCodeGenerator {
    prompt_length: usize,
}

impl SelectionCodeGenerator {
    pub fn new(prompt_length: usize) -> Self {
        Self {
            prompt_length: prompt_length.clamp(1, (GRID * GRID) as usize),
        }
    }

    fn render<R: Rng + ?Sized>(&self, rng: &mut R, cells: &[char]) -> Result<String, GenerateError> {
        let side = GRID * CELL;
        let mut canvas = Canvas::new(side, side, Rgba([245, 245, 245, 255]));
        let scale = 4;
        let (glyph_width, glyph_height) = glyph_size(scale);

        for (index, digit) in cells.iter().enumerate() {
            let (col, row) = (index as u32 % GRID, index as u32 / GRID);
            let (left, top) = ((col * CELL) as i32, (row * CELL) as i32);
            canvas.fill_rect(left + 2, top + 2, CELL - 4, CELL - 4, random_color(rng, 200, 240));
            canvas.draw_digit(
                *digit,
                left + ((CELL - glyph_width) / 2) as i32,
                top + ((CELL - glyph_height) / 2) as i32,
                scale,
                random_color(rng, 20, 100),
            );
        }
        canvas.speckle(rng, side * side / 30);
        canvas.scribble(rng, 4);

        canvas.to_base64_png()
    }
}

impl CodeGenerator for SelectionCodeGenerator {
    fn code_type(&self) -> CodeType {
        CodeType::Selection
    }

    fn generate(&self, _ctx: &RequestContext) -> Result<GeneratedChallenge, GenerateError> {
        let mut rng = rand::rng();
        let mut cells: Vec<char> = ('1'..='9').collect();
        cells.shuffle(&mut rng);

        let mut prompt = cells.clone();
        prompt.shuffle(&mut rng);
        prompt.truncate(self.prompt_length);

        let answer: String = prompt
            .iter()
            .filter_map(|digit| cells.iter().position(|cell| cell == digit))
            .map(|index| char::from(b'0' + index as u8))
            .collect();
        let image = self.render(&mut rng, &cells)?;

        Ok(GeneratedChallenge::new(
            ChallengeSecret::Code(ChallengeCode::new(answer)),
            Artifact::Selection {
                image,
                prompt: prompt.iter().map(char::to_string).collect(),
            },
        ))
    }
}

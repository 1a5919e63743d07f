use bastion_core::{
    Artifact, ChallengeSecret, CodeGenerator, CodeType, GenerateError, GeneratedChallenge, Point,
    RequestContext, TRACK_TOLERANCE, TrackPath,
};
use image::Rgba;
use rand::Rng;

use super::raster::{Canvas, glyph_size, random_color};

const MARKER_RADIUS: i32 = 11;
const MIN_SPACING: i32 = TRACK_TOLERANCE * 3;
const PLACEMENT_ATTEMPTS: usize = 64;

/// Canvas with numbered waypoints the client has to trace in order.
#[derive(Debug, Clone)]
pub struct TrackCodeGenerator {
    width: u32,
    height: u32,
}

impl TrackCodeGenerator {
    pub fn new(width: u32, height: u32) -> Self {
        let min = (MIN_SPACING * 4) as u32;
        Self {
            width: width.max(min),
            height: height.max(min),
        }
    }

    fn waypoints<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Point> {
        let count = rng.random_range(3..=4);
        let (w, h) = (self.width as i32, self.height as i32);
        let inset = MARKER_RADIUS + 2;

        let mut points: Vec<Point> = Vec::with_capacity(count);
        for _ in 0..PLACEMENT_ATTEMPTS {
            if points.len() == count {
                break;
            }
            let candidate = Point::new(
                rng.random_range(inset..w - inset),
                rng.random_range(inset..h - inset),
            );
            let spaced = points.iter().all(|p| {
                let (dx, dy) = (p.x - candidate.x, p.y - candidate.y);
                dx * dx + dy * dy >= MIN_SPACING * MIN_SPACING
            });
            if spaced {
                points.push(candidate);
            }
        }
        points
    }

    fn render(&self, points: &[Point]) -> Result<String, GenerateError> {
        let mut rng = rand::rng();
        let mut canvas = Canvas::new(self.width, self.height, random_color(&mut rng, 225, 250));
        canvas.speckle(&mut rng, self.width * self.height / 20);

        let (glyph_width, glyph_height) = glyph_size(2);
        for (i, point) in points.iter().enumerate() {
            canvas.draw_disc(point.x, point.y, MARKER_RADIUS, random_color(&mut rng, 30, 90));
            let label = char::from(b'1' + i as u8);
            canvas.draw_digit(
                label,
                point.x - glyph_width as i32 / 2,
                point.y - glyph_height as i32 / 2,
                2,
                Rgba([255, 255, 255, 255]),
            );
        }

        canvas.to_base64_png()
    }
}

impl CodeGenerator for TrackCodeGenerator {
    fn code_type(&self) -> CodeType {
        CodeType::Track
    }

    fn generate(&self, _ctx: &RequestContext) -> Result<GeneratedChallenge, GenerateError> {
        let points = self.waypoints(&mut rand::rng());
        if points.len() < 3 {
            return Err(GenerateError::Render(
                "Could not place track waypoints".to_string(),
            ));
        }
        let image = self.render(&points)?;

        Ok(GeneratedChallenge::new(
            ChallengeSecret::Track(TrackPath {
                points: points.clone(),
            }),
            Artifact::Track {
                image,
                points: points.len(),
            },
        ))
    }
}

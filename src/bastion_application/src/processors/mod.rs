pub mod default_processor;
mod lifecycle;
pub mod slider_processor;
pub mod track_processor;

#[cfg(test)]
pub(crate) mod test_support;

pub use default_processor::DefaultCodeProcessor;
pub use lifecycle::ChallengePolicy;
pub use slider_processor::{SliderCodeProcessor, SliderParams};
pub use track_processor::{TrackCodeProcessor, parse_track};

pub mod authorization;
pub mod classifier;
pub mod gate;
pub mod processors;
pub mod registry;

pub use authorization::{RefreshScope, UriAuthorizeService};
pub use classifier::{ClassificationRule, RequestClassifier};
pub use gate::{ChallengeGate, GateDecision};
pub use processors::{
    ChallengePolicy, DefaultCodeProcessor, SliderCodeProcessor, SliderParams, TrackCodeProcessor,
};
pub use registry::ProcessorRegistry;

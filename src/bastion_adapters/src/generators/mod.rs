//! Concrete challenge generators, one per code type.

mod customize_code;
mod image_code;
pub(crate) mod raster;
mod selection_code;
mod slider_code;
mod sms_code;
mod track_code;

pub use customize_code::CustomizeCodeGenerator;
pub use image_code::ImageCodeGenerator;
pub use selection_code::SelectionCodeGenerator;
pub use slider_code::SliderCodeGenerator;
pub use sms_code::SmsCodeGenerator;
pub use track_code::TrackCodeGenerator;

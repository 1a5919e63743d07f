pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AuthorizeSetting, BastionSetting, CodeSetting, ImageCodeSetting, RedisSetting, ServerSetting,
    SimpleCodeSetting, SliderCodeSetting, SmsCodeSetting, SmsGatewaySetting, TrackCodeSetting,
};

use std::{collections::HashMap, time::Duration};

use bastion_application::ClassificationRule;
use bastion_core::{CodeType, DEFAULT_MOBILE_PATTERN, MethodPermissions};
use secrecy::Secret;
use serde::Deserialize;

use crate::config::constants::{CONFIG_FILE, ENV_PREFIX};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BastionSetting {
    pub server: ServerSetting,
    pub redis: RedisSetting,
    pub sms_gateway: SmsGatewaySetting,
    pub codes: CodeSetting,
    pub authorize: AuthorizeSetting,
}

impl BastionSetting {
    /// Layers the optional `config/base` file, `.env` and `BASTION__*`
    /// environment variables, in that order.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSetting {
    pub address: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSetting {
    fn default() -> Self {
        Self {
            address: crate::config::prod::APP_ADDRESS.to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisSetting {
    /// Empty means the in-memory store is used.
    pub host_name: String,
    pub timeout_ms: u64,
}

impl Default for RedisSetting {
    fn default() -> Self {
        Self {
            host_name: String::new(),
            timeout_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmsGatewaySetting {
    /// Without a base URL SMS codes go to the logging mock client.
    pub base_url: Option<String>,
    pub auth_token: Option<Secret<String>>,
    pub timeout_ms: u64,
}

impl Default for SmsGatewaySetting {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            timeout_ms: 10_000,
        }
    }
}

/// Verification code configuration shared by all types.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodeSetting {
    /// Issue endpoints live at `{url_prefix}/{type}`.
    pub url_prefix: String,
    pub session_cookie: String,
    /// Marks the session cookie `Secure`; enable behind TLS.
    pub secure_cookie: bool,
    pub store_timeout_ms: u64,
    pub image: ImageCodeSetting,
    pub sms: SmsCodeSetting,
    pub slider: SliderCodeSetting,
    pub track: TrackCodeSetting,
    pub selection: SimpleCodeSetting,
    pub customize: SimpleCodeSetting,
}

impl Default for CodeSetting {
    fn default() -> Self {
        Self {
            url_prefix: "/code".to_string(),
            session_cookie: "bastion_session".to_string(),
            secure_cookie: false,
            store_timeout_ms: 500,
            image: ImageCodeSetting::default(),
            sms: SmsCodeSetting::default(),
            slider: SliderCodeSetting::default(),
            track: TrackCodeSetting::default(),
            selection: SimpleCodeSetting::named("selectionCode", 3),
            customize: SimpleCodeSetting::named("customizeCode", 6),
        }
    }
}

impl CodeSetting {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Every configured guarded URI, tagged with its code type.
    pub fn classification_rules(&self) -> Vec<ClassificationRule> {
        let per_type: [(CodeType, &[String]); 6] = [
            (CodeType::Image, &self.image.auth_urls),
            (CodeType::Sms, &self.sms.auth_urls),
            (CodeType::Slider, &self.slider.auth_urls),
            (CodeType::Track, &self.track.auth_urls),
            (CodeType::Selection, &self.selection.auth_urls),
            (CodeType::Customize, &self.customize.auth_urls),
        ];
        per_type
            .into_iter()
            .flat_map(|(code_type, urls)| {
                urls.iter()
                    .map(move |url| ClassificationRule::new(url.trim(), code_type))
            })
            .filter(|rule| !rule.pattern.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageCodeSetting {
    pub length: usize,
    pub expire: u64,
    pub width: u32,
    pub height: u32,
    pub param_name: String,
    pub auth_urls: Vec<String>,
    pub reusable: bool,
    pub ignore_case: bool,
}

impl Default for ImageCodeSetting {
    fn default() -> Self {
        Self {
            length: 4,
            expire: 300,
            width: 270,
            height: 60,
            param_name: "imageCode".to_string(),
            auth_urls: vec!["/authentication/form".to_string()],
            reusable: false,
            ignore_case: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmsCodeSetting {
    pub length: usize,
    pub expire: u64,
    pub param_name: String,
    pub mobile_param_name: String,
    pub mobile_pattern: String,
    pub auth_urls: Vec<String>,
    pub reusable: bool,
}

impl Default for SmsCodeSetting {
    fn default() -> Self {
        Self {
            length: 6,
            expire: 120,
            param_name: "smsCode".to_string(),
            mobile_param_name: "mobile".to_string(),
            mobile_pattern: DEFAULT_MOBILE_PATTERN.to_string(),
            auth_urls: vec!["/authentication/mobile".to_string()],
            reusable: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SliderCodeSetting {
    pub expire: u64,
    /// Lifetime of the token handed out after the first check.
    pub second_check_expire: u64,
    pub width: u32,
    pub height: u32,
    pub piece_size: u32,
    pub slider_check_url: String,
    pub token_param_name: String,
    pub x_param_name: String,
    pub y_param_name: String,
    pub auth_urls: Vec<String>,
    pub reusable: bool,
}

impl Default for SliderCodeSetting {
    fn default() -> Self {
        Self {
            expire: 180,
            second_check_expire: 60,
            width: 280,
            height: 160,
            piece_size: 44,
            slider_check_url: "/slider/check".to_string(),
            token_param_name: "sliderToken".to_string(),
            x_param_name: "x".to_string(),
            y_param_name: "y".to_string(),
            auth_urls: Vec::new(),
            reusable: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackCodeSetting {
    pub expire: u64,
    pub width: u32,
    pub height: u32,
    pub param_name: String,
    pub auth_urls: Vec<String>,
    pub reusable: bool,
}

impl Default for TrackCodeSetting {
    fn default() -> Self {
        Self {
            expire: 180,
            width: 280,
            height: 160,
            param_name: "trackCode".to_string(),
            auth_urls: Vec::new(),
            reusable: false,
        }
    }
}

/// Selection and custom codes only differ in their parameter name.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimpleCodeSetting {
    pub length: usize,
    pub expire: u64,
    pub param_name: String,
    pub auth_urls: Vec<String>,
    pub reusable: bool,
}

impl SimpleCodeSetting {
    fn named(param_name: &str, length: usize) -> Self {
        Self {
            length,
            expire: 180,
            param_name: param_name.to_string(),
            auth_urls: Vec::new(),
            reusable: false,
        }
    }
}

impl Default for SimpleCodeSetting {
    fn default() -> Self {
        Self::named("customizeCode", 6)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthorizeSetting {
    pub provider_timeout_ms: u64,
    /// HTTP method to permission verb, e.g. `GET = "list"`.
    pub method_permissions: HashMap<String, String>,
    /// Optional JSON file holding the role permission table.
    pub permission_table: Option<String>,
}

impl Default for AuthorizeSetting {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 500,
            method_permissions: HashMap::new(),
            permission_table: None,
        }
    }
}

impl AuthorizeSetting {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Configured mapping, or the REST defaults when none is given.
    pub fn method_permissions(&self) -> MethodPermissions {
        if self.method_permissions.is_empty() {
            return MethodPermissions::default();
        }
        self.method_permissions
            .iter()
            .fold(MethodPermissions::empty(), |methods, (method, permission)| {
                methods.with(method, permission.clone())
            })
    }
}

pub const CONFIG_FILE: &str = "config/base";
pub const ENV_PREFIX: &str = "BASTION";

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub mod sms_gateway {
        pub const AUTH_HEADER: &str = "X-Gateway-Token";
        pub const MESSAGES_PATH: &str = "/messages";
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub mod sms_gateway {
        use std::time::Duration;

        pub const TIMEOUT: Duration = Duration::from_millis(200);
    }
}

use std::time::Duration;

pub const APP_NAME: &str = "scaleset";

/// Settings file name inside the config directory.
pub const SETTINGS_FILENAME: &str = "config.toml";

/// Overall budget for a create-or-update to reach a terminal state.
pub const DEFAULT_CONVERGE_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Lower bound on the wait between two provisioning-state polls.
pub const DEFAULT_MIN_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";

pub const DEFAULT_ARM_API_VERSION: &str = "2016-03-30";

/// Provider namespace and resource type of a scale set inside an ARM id.
pub const SCALE_SET_PROVIDER: &str = "Microsoft.Compute";
pub const SCALE_SET_TYPE: &str = "virtualMachineScaleSets";

/// Separator appended after every field folded into a fingerprint.
pub const FINGERPRINT_DELIMITER: char = '-';
pub const FINGERPRINT_ESCAPE: char = '\\';

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "SCALESET_CONFIG";
pub const SUBSCRIPTION_ID_ENV: &str = "SCALESET_SUBSCRIPTION_ID";
pub const ARM_ENDPOINT_ENV: &str = "SCALESET_ARM_ENDPOINT";
/// Bearer token for the resource manager. Never read from the settings file.
pub const ARM_TOKEN_ENV: &str = "SCALESET_ARM_TOKEN";

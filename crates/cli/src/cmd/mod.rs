mod apply;
mod destroy;
mod plan;
mod read;

pub use apply::cmd_apply;
pub use destroy::cmd_destroy;
pub use plan::cmd_plan;
pub use read::cmd_read;

use anyhow::{Context, Result};

use scaleset_lib::consts::SUBSCRIPTION_ID_ENV;
use scaleset_lib::remote::ArmClient;
use scaleset_lib::settings::Settings;

/// Build the resource-manager client described by `settings`.
fn arm_client(settings: &Settings) -> Result<ArmClient> {
  let subscription_id = settings.arm.subscription_id.as_deref().with_context(|| {
    format!(
      "No subscription configured. Set arm.subscription_id in the settings file or {}",
      SUBSCRIPTION_ID_ENV
    )
  })?;

  let client = ArmClient::new(&settings.arm.endpoint, subscription_id).with_api_version(&settings.arm.api_version);
  Ok(match &settings.arm.token {
    Some(token) => client.with_token(token),
    None => client,
  })
}

fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}

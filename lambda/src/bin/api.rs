use anyhow::Context;
use dicebot::api::{BotContext, handler};
use dicebot::core::config::AppConfig;
use lambda_runtime::service_fn;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    dicebot::setup_logging();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    if let Some(project) = &config.error_reporting_project {
        dicebot::reporting::init(project);
        info!(project = %project, "Error reporting enabled");
    }

    let context = BotContext::from_config(config).context("failed to build bot context")?;
    let context = &context;
    lambda_runtime::run(service_fn(move |event| async move { handler(context, event).await })).await
}

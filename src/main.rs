use anyhow::Result;
use asg_metrics::config::AppConfig;
use asg_metrics::handler::{self, AwsClientFactory};
use asg_metrics::mode::{ExecutionMode, RuntimeDiagnostics};
use asg_metrics::version;
use lambda_runtime::{LambdaEvent, service_fn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mode = ExecutionMode::from_env();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        // CloudWatch Logs shows escape codes verbatim
        .with_ansi(mode == ExecutionMode::OneShot)
        .init();

    tracing::info!("{} starting", version::banner());

    match mode {
        ExecutionMode::Serverless { execution_env } => {
            let diagnostics = RuntimeDiagnostics::from_env();
            tracing::info!(
                execution_env = %execution_env,
                function_version = diagnostics.function_version.as_deref().unwrap_or("-"),
                memory_size_mb = diagnostics.memory_size_mb.as_deref().unwrap_or("-"),
                "[lambda] registering handler"
            );
            lambda_runtime::run(service_fn(
                |_event: LambdaEvent<serde_json::Value>| async {
                    handler::handle(AppConfig::load, &AwsClientFactory)
                        .await
                        .map_err(lambda_runtime::Error::from)
                },
            ))
            .await
            .map_err(|e| anyhow::anyhow!("lambda runtime: {}", e))?;
        }
        ExecutionMode::OneShot => {
            let response = handler::handle(AppConfig::load, &AwsClientFactory).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            anyhow::ensure!(
                response.is_success(),
                "invocation returned status {}",
                response.status_code
            );
        }
    }

    Ok(())
}

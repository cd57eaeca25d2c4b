use cf_firewall_sync::app::trigger::{handle_event, TriggerEvent, TriggerResponse};
use cf_firewall_sync::utils::logger;
use cf_firewall_sync::TriggerEnv;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(event: LambdaEvent<TriggerEvent>) -> Result<TriggerResponse, Error> {
    tracing::info!("Invocation {}", event.context.request_id);

    let env = TriggerEnv::from_env();
    let response = handle_event(event.payload, &env).await?;

    tracing::info!("Invocation finished with status {}", response.status_code);
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}

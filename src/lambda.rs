#[cfg(feature = "lambda")]
use contact_relay::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use contact_relay::{build_handler, ContactHandler, HttpRequest, HttpResponse, RelayConfig};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &ContactHandler,
    event: LambdaEvent<HttpRequest>,
) -> Result<HttpResponse, Error> {
    tracing::info!(
        request_id = %event.context.request_id,
        method = %event.payload.http_method,
        "Contact form invocation"
    );

    let response = handler.handle(&event.payload).await;

    tracing::info!(status = response.status_code, "Contact form invocation finished");
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時載入一次設定，之後的呼叫共用同一組 client
    let config = RelayConfig::from_env()?;
    config.validate()?;
    tracing::info!("Starting contact relay Lambda function ({} mode)", config.mode);

    let handler = build_handler(config)?;
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<HttpRequest>| async move {
        function_handler(handler, event).await
    }))
    .await
}

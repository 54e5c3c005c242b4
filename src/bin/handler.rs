//! Lambda entry point for the items API.

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use modular_stack::handler::{handle_request, ApiEvent, DynamoItemStore, ItemStore};

async fn function_handler(
    store: &dyn ItemStore,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "invocation");
    let request = ApiEvent::from(event.payload);
    Ok(handle_request(store, &request).await.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("modular_stack=info,handler=info")),
        )
        .with_current_span(false)
        .without_time()
        .init();

    let table_name = std::env::var("TABLE_NAME").map_err(|_| "TABLE_NAME not set")?;
    let stage = std::env::var("STAGE").unwrap_or_default();
    let store = DynamoItemStore::new(table_name).await;
    tracing::info!(table = %store.table_name(), stage = %stage, "handler starting");

    run(service_fn(|event| function_handler(&store, event))).await
}

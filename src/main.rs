use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use brand_guardian::application::services::{AuditPipeline, AuditStage, IndexingStage, PollPolicy};
use brand_guardian::infrastructure::llm::{AzureChatClient, AzureOpenAiEmbedder};
use brand_guardian::infrastructure::observability::init_tracing;
use brand_guardian::infrastructure::search::AzureSearchRetriever;
use brand_guardian::infrastructure::video::{
    AzureVideoIndexer, AzureVideoIndexerConfig, YtDlpDownloader,
};
use brand_guardian::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&settings.tracing_config(environment));

    let pipeline = Arc::new(build_pipeline(&settings)?);
    let router = create_router(AppState::new(pipeline));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = %environment, "Brand Guardian listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_pipeline(settings: &Settings) -> anyhow::Result<AuditPipeline> {
    let vi = &settings.video_indexer;
    let video_indexer = AzureVideoIndexer::new(AzureVideoIndexerConfig {
        api_base_url: vi.api_base_url.clone(),
        management_base_url: vi.management_base_url.clone(),
        location: vi.location.clone(),
        account_id: vi.account_id.clone(),
        subscription_id: vi.subscription_id.clone(),
        resource_group: vi.resource_group.clone(),
        account_name: vi.account_name.clone(),
        arm_access_token: vi.arm_access_token.clone(),
    })
    .context("Failed to build video indexer client")?;

    let mut indexing_stage = IndexingStage::new(
        Arc::new(YtDlpDownloader::default()),
        Arc::new(video_indexer),
        PollPolicy {
            interval: settings.pipeline.poll_interval(),
            timeout: settings.pipeline.poll_timeout(),
        },
    );
    if let Some(work_dir) = &settings.pipeline.work_dir {
        indexing_stage = indexing_stage.with_work_dir(work_dir);
    }

    let openai = &settings.openai;
    let embedder = AzureOpenAiEmbedder::new(
        &openai.endpoint,
        &openai.embedding_deployment,
        &openai.api_key,
        &openai.api_version,
    )
    .context("Failed to build embedding client")?;

    let search = &settings.search;
    let retriever = AzureSearchRetriever::new(
        &search.endpoint,
        &search.index_name,
        &search.api_key,
        &search.api_version,
        Arc::new(embedder),
    )
    .with_fields(&search.content_field, &search.vector_field);

    let chat_client = AzureChatClient::new(
        &openai.endpoint,
        &openai.chat_deployment,
        &openai.api_key,
        &openai.api_version,
        openai.temperature,
    );

    let audit_stage = AuditStage::new(Arc::new(retriever), Arc::new(chat_client), search.top_k);

    Ok(AuditPipeline::new(
        Arc::new(indexing_stage),
        Arc::new(audit_stage),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! Application state and sub-states.
//!
//! Handlers take `State<Arc<AppState>>` and reach into the sub-state they need. The auth
//! and credit gates sit behind traits so the router can run against in-memory stores.

use hestia_core::Config;
use hestia_db::{
    ContractRepository, CreditLedger, PaymentRepository, SessionResolver, SocialRepository,
};
use hestia_providers::{
    GeminiClient, ImageGenerator, PaymentGatewayClient, SpeechClient, UploadPostClient,
};
use hestia_storage::Storage;
use hestia_worker::{EnhancementRunner, RedesignOrchestrator, RetryPolicy};
use sqlx::PgPool;
use std::sync::Arc;

/// Pool and the repositories handlers query directly.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub payments: PaymentRepository,
    pub social: SocialRepository,
    pub contracts: ContractRepository,
}

impl DbState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            payments: PaymentRepository::new(pool.clone()),
            social: SocialRepository::new(pool.clone()),
            contracts: ContractRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Session lookup and credit spending used by the request gates.
#[derive(Clone)]
pub struct GateState {
    pub sessions: Arc<dyn SessionResolver>,
    pub credits: Arc<dyn CreditLedger>,
}

/// AI generation: the redesign queue, the enhancement loop and caption text.
#[derive(Clone)]
pub struct GenerationState {
    pub orchestrator: RedesignOrchestrator,
    pub enhancer: EnhancementRunner,
    pub captions: GeminiClient,
}

/// Third-party APIs outside generation.
#[derive(Clone)]
pub struct IntegrationState {
    pub upload_post: UploadPostClient,
    pub payment_gateway: PaymentGatewayClient,
    pub speech: SpeechClient,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub gates: GateState,
    pub storage: Arc<dyn Storage>,
    pub generation: GenerationState,
    pub integrations: IntegrationState,
}

impl AppState {
    /// Wire the state from its external pieces; provider clients are built from `config`.
    pub fn new(
        config: Config,
        pool: PgPool,
        storage: Arc<dyn Storage>,
        generator: Arc<dyn ImageGenerator>,
        gates: GateState,
    ) -> anyhow::Result<Self> {
        let providers = config.providers();
        let retry = config.retry();

        let generation = GenerationState {
            orchestrator: RedesignOrchestrator::new(
                generator.clone(),
                RetryPolicy::redesign(retry),
            ),
            enhancer: EnhancementRunner::new(generator, RetryPolicy::enhancement(retry)),
            captions: GeminiClient::new(providers)?,
        };

        let integrations = IntegrationState {
            upload_post: UploadPostClient::new(providers)?,
            payment_gateway: PaymentGatewayClient::new(providers)?,
            speech: SpeechClient::new(providers)?,
        };

        Ok(Self {
            db: DbState::new(pool),
            config,
            gates,
            storage,
            generation,
            integrations,
        })
    }
}

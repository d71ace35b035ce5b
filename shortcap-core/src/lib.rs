pub mod config;
pub mod enforcement;

use shortcap_database::{Database, QuotaEngine};

pub use config::EnforcementConfig;
pub use enforcement::Enforcer;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub quota: QuotaEngine,
    pub enforcer: Enforcer,
    pub config: EnforcementConfig,
}

impl Data {
    /// Wire the engine and enforcer around one database handle.
    pub fn new(db: Database, config: EnforcementConfig) -> Self {
        let quota = QuotaEngine::new(db, config.window());
        let enforcer = Enforcer::new(quota.clone(), config.clone());

        Self {
            quota,
            enforcer,
            config,
        }
    }
}

pub type Context<'a> = poise::Context<'a, Data, Error>;

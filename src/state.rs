//! Application state: quest catalog, student/progress stores, hint advisor, and tuning.
//!
//! This module owns:
//!   - the read-only content store (seeds + optional TOML quest bank)
//!   - the versioned in-memory student and progress stores
//!   - the prompts and gamification rules (from TOML or defaults)
//!   - the optional hint advisor (OpenAI client when an API key is present)

use std::{sync::Arc, time::Duration};
use tracing::{info, instrument};

use crate::config::{load_config_from_env, AppConfig, GamificationRules, Prompts};
use crate::content::ContentStore;
use crate::openai::{HintAdvisor, OpenAI};
use crate::seeds::seed_quests;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentStore>,
    pub store: Store,
    pub advisor: Option<Arc<dyn HintAdvisor>>,
    pub prompts: Prompts,
    pub rules: GamificationRules,
    pub hint_timeout: Duration,
    pub max_commit_retries: u32,
}

impl AppState {
    /// Build state from env: load config, build the quest catalog, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_config_from_env().unwrap_or_default();
        let hint_timeout = Duration::from_secs(cfg.advisor.timeout_secs.max(1));

        // Build optional OpenAI client (if API key present).
        let openai = OpenAI::from_env(hint_timeout, cfg.advisor.temperature);
        let advisor: Option<Arc<dyn HintAdvisor>> = match openai {
            Some(oa) => {
                info!(target: "eduquest_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI hint advisor enabled.");
                Some(Arc::new(oa))
            }
            None => {
                info!(target: "eduquest_backend", "OpenAI disabled (no OPENAI_API_KEY). Hints use the fixed fallback.");
                None
            }
        };

        Self::from_config(cfg, advisor)
    }

    /// Assemble state from an already-loaded config and advisor.
    pub fn from_config(cfg: AppConfig, advisor: Option<Arc<dyn HintAdvisor>>) -> Self {
        // Built-in quests first so a bank entry cannot shadow a seed id.
        let mut quests = seed_quests();
        quests.extend(cfg.quests);

        info!(
            target: "eduquest_backend",
            completion_threshold = cfg.gamification.completion_threshold,
            xp_per_level = cfg.gamification.xp_per_level,
            "Gamification rules"
        );

        Self {
            content: Arc::new(ContentStore::new(quests)),
            store: Store::new(),
            advisor,
            prompts: cfg.prompts,
            rules: cfg.gamification,
            hint_timeout: Duration::from_secs(cfg.advisor.timeout_secs.max(1)),
            max_commit_retries: cfg.store.max_commit_retries,
        }
    }
}

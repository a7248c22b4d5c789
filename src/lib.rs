pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    ai_service::{AIService, OpenAiGateway},
    proxy_service::ProxyService,
    study_service::StudyService,
    user_service::UserService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub ai_service: AIService,
    pub study_service: StudyService,
    pub user_service: UserService,
    pub proxy_service: ProxyService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Result<Self> {
        let http_client = Client::builder().timeout(config.llm_timeout).build()?;

        let gateway = OpenAiGateway::new(
            http_client.clone(),
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.openai_model.clone(),
            config.llm_timeout,
        );
        let ai_service = AIService::new(Arc::new(gateway));
        let study_service = StudyService::new(pool.clone());
        let user_service = UserService::new(pool.clone());
        let proxy_service = ProxyService::new(http_client, config.proxy_upstream_url.clone());

        Ok(Self {
            pool,
            config: Arc::new(config),
            ai_service,
            study_service,
            user_service,
            proxy_service,
        })
    }
}

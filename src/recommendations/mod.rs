//! Language-model recommendations for FTTH deployments

mod cohere;
pub mod prompt;

pub use cohere::CohereClient;
pub use prompt::{ProjectSettings, build_prompt};

use anyhow::Result;
use async_trait::async_trait;

/// System preamble sent with every recommendation request
pub const EXPERT_PREAMBLE: &str =
    "Eres un ingeniero experto en telecomunicaciones especializado en redes FTTH.";

/// Message used by the connectivity check
pub const PING_MESSAGE: &str = "Responde con 'OK' si puedes recibir este mensaje.";

/// Text shown to users when recommendations could not be generated
pub const FALLBACK_RECOMMENDATIONS: &str = "No se pudieron generar recomendaciones con IA. Verifica la configuración de la API key y la conectividad.";

/// A hosted model that turns a prompt into deployment recommendations
#[async_trait]
pub trait RecommendationEngine: Send + Sync {
    /// Model identifier reported back to clients
    fn model(&self) -> &str;

    /// Whether credentials are available at all
    fn is_configured(&self) -> bool;

    /// Generate recommendations for a fully built prompt
    async fn recommend(&self, prompt: &str) -> Result<String>;

    /// Send a tiny request to confirm the model answers
    async fn ping(&self) -> Result<String>;
}

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Backendless application id
    pub backendless_app_id: String,

    /// Backendless REST API key
    pub backendless_rest_api_key: String,

    /// Backendless REST base URL
    #[serde(default = "default_backendless_api_url")]
    pub backendless_api_url: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin allowed by CORS (the chat frontend)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// How a best-scoring intent is accepted
    #[serde(default)]
    pub intent_policy: IntentPolicyKind,

    /// Minimum z-score for the `zscore` policy
    #[serde(default = "default_intent_min_z")]
    pub intent_min_z: f32,

    /// Minimum similarity for the `cutoff` policy
    #[serde(default = "default_intent_cutoff")]
    pub intent_cutoff: f32,

    /// OpenAI-compatible embeddings endpoint. The lexical scorer is used when unset.
    #[serde(default)]
    pub embedding_api_url: Option<String>,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default)]
    pub embedding_api_key: Option<String>,

    /// Number of catalog results kept per recommendation
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntentPolicyKind {
    #[default]
    Zscore,
    Cutoff,
}

fn default_backendless_api_url() -> String {
    "https://api.backendless.com".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "http://localhost:5500".to_string()
}

fn default_intent_min_z() -> f32 {
    0.5
}

fn default_intent_cutoff() -> f32 {
    0.55
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_max_results() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where and how to reach the Score Service.
#[derive(Debug, Clone)]
pub struct ScoreServiceConfig {
    /// Base URL without a trailing slash; `/scores` is appended.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ScoreServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fruit-quest-api.herokuapp.com".to_string(),
            timeout_secs: 10,
            user_agent: "fruitquest-scores/0.1".to_string(),
        }
    }
}

impl ScoreServiceConfig {
    /// Defaults, with `FRUITQUEST_SCORES_URL` overriding the base URL.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("FRUITQUEST_SCORES_URL")
            && !url.is_empty()
        {
            config.base_url = url;
        }
        config
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub(crate) fn scores_url(&self) -> String {
        format!("{}/scores", self.base_url.trim_end_matches('/'))
    }
}

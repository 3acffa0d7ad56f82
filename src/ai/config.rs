use std::env;

#[derive(Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub chat_url: Option<String>,
}

impl AiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = match env::var("GROQ_API_KEY") {
            Ok(k) => k,
            Err(_) => return None,
        };
        Some(Self {
            api_key,
            model: env::var("GROQ_MODEL").unwrap_or_else(|_| "llama-3.1-70b-versatile".to_string()),
            chat_url: env::var("GROQ_CHAT_URL").ok(),
        })
    }
}

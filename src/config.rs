use std::env;

use crate::ai::config::AiConfig;
use crate::extract::DEFAULT_LABELS;

#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub labels: Vec<String>,
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let bind_addr = env::var("PLANFIT_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let api_token = env::var("PLANFIT_API_TOKEN").ok().filter(|t| !t.is_empty());
        let labels = env::var("PLAN_SECTIONS")
            .map(|raw| parse_labels(&raw))
            .ok()
            .filter(|labels| !labels.is_empty())
            .unwrap_or_else(|| DEFAULT_LABELS.iter().map(|s| s.to_string()).collect());
        let ai = AiConfig::from_env();
        Self {
            bind_addr,
            api_token,
            labels,
            ai,
        }
    }
}

fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_labels_trims_and_drops_empty() {
        assert_eq!(
            parse_labels(" Meals , Snacks ,,Workouts"),
            vec!["Meals", "Snacks", "Workouts"]
        );
        assert!(parse_labels(" , ").is_empty());
    }
}

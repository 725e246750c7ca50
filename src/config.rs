use std::path::PathBuf;

use color_eyre::eyre::Context;
use once_cell::sync::Lazy;
use reqwest::Url;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_request_limit")]
    pub request_limit: u32,
    #[serde(default = "default_monitored_top_posts")]
    pub monitored_top_posts: usize,
    #[serde(default = "default_max_data_log_length")]
    pub max_data_log_length: usize,
}

fn default_base_url() -> Url {
    Url::parse("https://www.reddit.com/").unwrap()
}

fn default_user_agent() -> String {
    "reddit-top-tracker/0.1 (snapshot diff monitor)".into()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_request_limit() -> u32 {
    50
}

fn default_monitored_top_posts() -> usize {
    10
}

fn default_max_data_log_length() -> usize {
    300
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenvy::dotenv().ok();
    envy::from_env::<Config>()
        .wrap_err("failed to load config")
        .unwrap()
});

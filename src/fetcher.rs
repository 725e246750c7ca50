use color_eyre::{Result, eyre::eyre};
use log::debug;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::CONFIG;
use crate::util::shorten_for_log;

/// A post exactly as the listing returned it. Only `id` and `score` carry
/// meaning here; everything else is passed through untouched.
pub type Post = serde_json::Map<String, Value>;
pub type Posts = Vec<Post>;

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(&CONFIG.user_agent)
        .build()
        .expect("Failed to build API client")
});

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    data: Post,
}

fn listing_posts(listing: Listing) -> Result<Posts> {
    let posts: Posts = listing
        .data
        .children
        .into_iter()
        .map(|child| child.data)
        .collect();
    if posts.is_empty() {
        return Err(eyre!("received an empty listing from the Reddit API"));
    }
    Ok(posts)
}

pub trait Fetcher {
    fn fetch(&self, source: &str) -> Result<Posts>;
}

pub struct RedditFetcher;

impl Fetcher for RedditFetcher {
    fn fetch(&self, source: &str) -> Result<Posts> {
        let url = CONFIG.base_url.join(&format!("r/{source}/top.json"))?;
        let listing: Listing = CLIENT
            .get(url)
            .query(&[("limit", CONFIG.request_limit)])
            .send()?
            .error_for_status()?
            .json()?;
        let posts = listing_posts(listing)?;
        debug!(
            "Current data for r/{source}: {}",
            shorten_for_log(&posts, CONFIG.max_data_log_length)
        );
        Ok(posts)
    }
}

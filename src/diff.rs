use std::collections::{HashMap, HashSet};

use color_eyre::{Result, eyre::eyre};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fetcher::Post;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub id: String,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffPayload {
    pub new_items: Vec<Post>,
    pub demoted_ids: Vec<String>,
    pub score_changes: Vec<ScoreChange>,
}

/// One comparison between two consecutive snapshots of a source. Carries a
/// payload on success, an error string when the fetch or the computation
/// failed, and neither when there was no previous data to compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub timestamp_previous: String,
    pub timestamp_current: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn post_id(post: &Post) -> Result<&str> {
    post.get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| eyre!("post record has no string `id` field"))
}

fn post_score(post: &Post) -> Result<i64> {
    post.get("score")
        .and_then(Value::as_i64)
        .ok_or_else(|| eyre!("post record has no integer `score` field"))
}

pub fn compute_diff(previous: &[Post], current: &[Post], top_n: usize) -> Result<DiffPayload> {
    // Duplicate ids collapse to the last occurrence, map-overwrite style.
    let previous_by_id: HashMap<&str, &Post> = previous
        .iter()
        .map(|post| post_id(post).map(|id| (id, post)))
        .collect::<Result<_>>()?;

    let mut new_items = Vec::new();
    let mut score_changes = Vec::new();
    for post in current {
        let id = post_id(post)?;
        match previous_by_id.get(id) {
            None => new_items.push(post.clone()),
            Some(old) => {
                let delta = post_score(post)? - post_score(old)?;
                if delta != 0 {
                    score_changes.push(ScoreChange {
                        id: id.to_string(),
                        delta,
                    });
                }
            }
        }
    }

    let previous_top: Vec<&str> = previous
        .iter()
        .take(top_n)
        .map(post_id)
        .collect::<Result<_>>()?;
    let current_top: HashSet<&str> = current
        .iter()
        .take(top_n)
        .map(post_id)
        .collect::<Result<_>>()?;
    let demoted_ids = previous_top
        .into_iter()
        .filter(|id| !current_top.contains(id))
        .map(str::to_string)
        .collect();

    Ok(DiffPayload {
        new_items,
        demoted_ids,
        score_changes,
    })
}

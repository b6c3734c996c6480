//! Ranking of trending posts from a Reddit-style listing, used as caption-writing context.

use crate::foundation::error::{CaptionError, CaptionResult};

/// Default number of records kept by [`rank_trends`].
pub const DEFAULT_TREND_LIMIT: usize = 10;

/// One post that survived keyword filtering.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TrendRecord {
    pub title: String,
    pub upvote_count: i64,
    pub url: String,
    pub subreddit: String,
    /// Unix seconds, UTC.
    pub created_timestamp: f64,
}

#[derive(serde::Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(serde::Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(serde::Deserialize)]
struct Child {
    data: Post,
}

#[derive(serde::Deserialize)]
struct Post {
    title: String,
    #[serde(default)]
    ups: i64,
    #[serde(default)]
    url: String,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    created_utc: f64,
}

/// Filter, sort and truncate the posts of `listing_json`.
///
/// A post is dropped when its lowercased title contains any lowercased keyword of
/// `exclude_keywords`. Survivors are sorted by upvotes, highest first; ties keep listing order.
pub fn rank_trends(
    listing_json: &str,
    exclude_keywords: &[String],
    limit: usize,
) -> CaptionResult<Vec<TrendRecord>> {
    let listing: Listing = serde_json::from_str(listing_json)
        .map_err(|e| CaptionError::validation(format!("invalid listing json: {e}")))?;
    let excluded: Vec<String> = exclude_keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let total = listing.data.children.len();
    let mut records: Vec<TrendRecord> = listing
        .data
        .children
        .into_iter()
        .map(|c| c.data)
        .filter(|p| {
            let title = p.title.to_lowercase();
            !excluded.iter().any(|k| title.contains(k.as_str()))
        })
        .map(|p| TrendRecord {
            title: p.title,
            upvote_count: p.ups,
            url: p.url,
            subreddit: p.subreddit,
            created_timestamp: p.created_utc,
        })
        .collect();

    records.sort_by(|a, b| b.upvote_count.cmp(&a.upvote_count));
    records.truncate(limit);
    tracing::debug!(total, kept = records.len(), "ranked trends");
    Ok(records)
}

/// Plain-text context block listing each record's title and link.
pub fn trends_context(records: &[TrendRecord]) -> String {
    let mut out = String::new();
    for r in records {
        out.push_str(&format!("title: {}\nurl: {}\n\n", r.title, r.url));
    }
    out
}

/// Player portrait lookup via the Wikipedia MediaWiki API.
///
/// Best-effort: every failure path collapses to Ok(None) at the call site's
/// discretion — a missing portrait must never block a score update.
use crate::client::{ApiError, ApiResult, CricApi};
use serde::Deserialize;
use std::collections::HashMap;

const WIKI_API: &str = "https://en.wikipedia.org/w/api.php";

#[derive(Debug, Deserialize, Default)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize, Default)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize, Default)]
struct PagesResponse {
    query: Option<PagesQuery>,
}

#[derive(Debug, Deserialize, Default)]
struct PagesQuery {
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

/// Look up a player's portrait thumbnail by display name.
/// Returns Ok(None) when no page or no image exists.
pub async fn fetch_player_portrait(api: &CricApi, player_name: &str) -> ApiResult<Option<String>> {
    fetch_player_portrait_at(api, WIKI_API, player_name).await
}

pub async fn fetch_player_portrait_at(
    api: &CricApi,
    base: &str,
    player_name: &str,
) -> ApiResult<Option<String>> {
    if player_name.trim().is_empty() {
        return Ok(None);
    }

    // Appending "cricketer" reduces ambiguity for short initialed names.
    let search_url = format!(
        "{base}?action=query&list=search&srsearch={}&format=json",
        urlencode(&format!("{player_name} cricketer"))
    );
    let search: SearchResponse = get_json(api, &search_url).await?;
    let Some(hit) = search.query.and_then(|q| q.search.into_iter().next()) else {
        return Ok(None);
    };

    let image_url = format!(
        "{base}?action=query&titles={}&prop=pageimages&format=json&pithumbsize=500",
        urlencode(&hit.title)
    );
    let pages: PagesResponse = get_json(api, &image_url).await?;
    let thumb = pages
        .query
        .map(|q| q.pages)
        .unwrap_or_default()
        .into_values()
        .find_map(|p| p.thumbnail)
        .map(|t| t.source);
    Ok(thumb)
}

async fn get_json<T: Default + serde::de::DeserializeOwned>(
    api: &CricApi,
    url: &str,
) -> ApiResult<T> {
    api.http()
        .get(url)
        .send()
        .await
        .map_err(|e| ApiError::Network(e, url.to_owned()))?
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parsing(e, url.to_owned()))
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push_str("%20"),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

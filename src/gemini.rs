//! Gemini web-search client.
//!
//! One `generateContent` call with the `google_search` tool does the
//! actual event extraction: the model searches the active source URLs and
//! returns a JSON array matching the response schema. The call is a black
//! box here; any failure surfaces as a single fetch error and the caller
//! keeps its previous state.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};

use kulturcal_core::event::GroundingSource;
use kulturcal_core::ingest::RawEvent;

pub const DEFAULT_API_HOSTNAME: &str = "https://generativelanguage.googleapis.com";

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Raw result of one search call: loosely-typed event records plus the
/// grounding citations the model used.
#[derive(Debug, Default)]
pub struct SearchResult {
    pub events: Vec<RawEvent>,
    pub sources: Vec<GroundingSource>,
}

/// Ask Gemini to search the given venue URLs for upcoming events.
///
/// `api_hostname` is injectable so tests can point at a mock server.
pub async fn fetch_events(
    urls: &[String],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<SearchResult> {
    if urls.is_empty() {
        return Ok(SearchResult::default());
    }

    let payload = json!({
        "contents": [{"parts": [{"text": build_prompt(urls)}]}],
        "tools": [{"google_search": {}}],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        }
    });

    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        api_hostname.trim_end_matches('/'),
        model
    );
    let response: Value = reqwest::Client::new()
        .post(url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .json(&payload)
        .send()
        .await
        .context("Gemini request failed")?
        .error_for_status()
        .context("Gemini returned an error status")?
        .json()
        .await
        .context("Gemini response was not valid JSON")?;

    parse_response(&response)
}

fn build_prompt(urls: &[String]) -> String {
    let url_list = urls
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{}. {}", i + 1, url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Search the following cultural venue websites for upcoming events in the next 3 months:\n\
        {url_list}\n\
        \n\
        For each event found, extract:\n\
        - Title of the performance/event\n\
        - Date in YYYY-MM-DD format\n\
        - Start time (if available, else leave blank or guess common times like 19:30 or 20:00)\n\
        - Location (The specific hall or venue name)\n\
        - Organizer (The name of the venue or organizer associated with the URL)\n\
        - URL (The direct link to the event page or the venue's main schedule page where you found it)\n\
        \n\
        Ensure the output is a valid JSON array of objects."
    )
}

fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {"type": "STRING"},
                "date": {"type": "STRING"},
                "time": {"type": "STRING"},
                "location": {"type": "STRING"},
                "organizer": {
                    "type": "STRING",
                    "description": "The name of the venue or organizer"
                },
                "url": {
                    "type": "STRING",
                    "description": "The URL of the event or venue website"
                }
            },
            "required": ["title", "date", "time", "location", "organizer", "url"]
        }
    })
}

fn parse_response(response: &Value) -> Result<SearchResult> {
    let text = response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| anyhow!("No text content in Gemini response"))?;

    let events: Vec<RawEvent> =
        serde_json::from_str(text.trim()).context("Gemini returned malformed event JSON")?;

    let sources = response["candidates"][0]["groundingMetadata"]["groundingChunks"]
        .as_array()
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|chunk| {
                    let web = chunk.get("web")?;
                    Some(GroundingSource {
                        title: web.get("title").and_then(Value::as_str).map(str::to_string),
                        uri: web.get("uri").and_then(Value::as_str).map(str::to_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(SearchResult { events, sources })
}

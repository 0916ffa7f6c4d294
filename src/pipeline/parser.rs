use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());

/// content fields recognized in a model response. A `None` field was absent
/// from the response and must not overwrite what's already stored
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ParsedMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// comma-joined tag list
    pub tags: Option<String>,
}

impl ParsedMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.tags.is_none()
    }

    pub fn title_length(&self) -> Option<u32> {
        self.title.as_ref().map(|title| {
            if title == "-" {
                0
            } else {
                title.chars().count() as u32
            }
        })
    }

    pub fn tags_count(&self) -> Option<u32> {
        self.tags.as_ref().map(|tags| {
            if tags == "-" {
                return 0;
            }
            tags.replace(',', " ")
                .split_whitespace()
                .filter(|tag| !tag.is_empty())
                .count() as u32
        })
    }
}

/// Extracts one JSON object from the model's free text: a ```json fenced
/// block first, else the first `{...}` span, else the whole trimmed text.
/// `None` means nothing in the response parsed as JSON; parsing is best-effort
/// enrichment, so the caller treats that as a non-error.
pub fn parse_ai_result(raw: &str) -> Option<ParsedMetadata> {
    let json_str = extract_json(raw);
    let value: Value = match serde_json::from_str(&json_str) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to parse AI result as JSON: {e}");
            log::debug!("Raw AI result: {raw}");
            return None;
        }
    };
    let object = value.as_object()?;
    let mut parsed = ParsedMetadata::default();
    if let Some(title) = object.get("title").and_then(nonblank_string) {
        parsed.title = Some(title);
    }
    if let Some(description) = object.get("description").and_then(nonblank_string) {
        parsed.description = Some(description);
    }
    // tags may arrive under either key, as a list or as a single string
    let keywords = object.get("keywords").or_else(|| object.get("tags"));
    if let Some(keywords) = keywords {
        match keywords {
            Value::Array(entries) => {
                let tags: Vec<String> = entries
                    .iter()
                    .filter_map(keyword_text)
                    .collect();
                if !tags.is_empty() {
                    parsed.tags = Some(tags.join(", "));
                }
            }
            other => {
                if let Some(tags) = keyword_text(other) {
                    parsed.tags = Some(tags);
                }
            }
        }
    }
    Some(parsed)
}

fn extract_json(raw: &str) -> String {
    if let Some(caps) = FENCED_JSON.captures(raw) {
        return caps[1].to_string();
    }
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            return raw[start..=end].to_string();
        }
    }
    raw.trim().to_string()
}

fn nonblank_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn keyword_text(value: &Value) -> Option<String> {
    nonblank_string(value)
}

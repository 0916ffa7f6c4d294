use crate::config::{MediaCatalogConfig, PromptSettingsConfig};

/// used when every configured segment is blank
const FALLBACK_PROMPT: &str =
    "Analyze this image and provide a detailed description in JSON format.";

/// Assembles the instruction text sent with every image: base, default,
/// custom ("Additional instructions: "), negative ("Avoid: "), exclude
/// ("Exclude: "), then the mandatory format segment, in that order, skipping
/// blank segments, joined by blank lines. Sizing placeholders in the first
/// three segments are replaced with the configured values.
pub fn build_final_prompt(config: &MediaCatalogConfig) -> String {
    let prompts = &config.prompts;
    let settings = &config.settings;
    let mut parts: Vec<String> = Vec::new();
    let base = apply_placeholders(&prompts.base_prompt, settings);
    if !base.trim().is_empty() {
        parts.push(base);
    }
    let default = apply_placeholders(&prompts.default_prompt, settings);
    if !default.trim().is_empty() {
        parts.push(default);
    }
    let custom = apply_placeholders(&prompts.custom_prompt, settings);
    let custom = custom.trim();
    if !custom.is_empty() {
        parts.push(format!("Additional instructions: {custom}"));
    }
    let negative = prompts.negative_prompt.trim();
    if !negative.is_empty() {
        parts.push(format!("Avoid: {negative}"));
    }
    let exclude = prompts.exclude_prompt.trim();
    if !exclude.is_empty() {
        parts.push(format!("Exclude: {exclude}"));
    }
    let mandatory = prompts.mandatory_prompt.trim();
    if !mandatory.is_empty() {
        parts.push(mandatory.to_string());
    }
    if parts.is_empty() {
        FALLBACK_PROMPT.to_string()
    } else {
        parts.join("\n\n")
    }
}

fn apply_placeholders(prompt: &str, settings: &PromptSettingsConfig) -> String {
    prompt
        .replace(
            "TITLE_LENGTH_PLACEHOLDER",
            &format!("{}-{}", settings.title_min_length, settings.title_max_length),
        )
        .replace("KEYWORDS_COUNT_PLACEHOLDER", &settings.tags_count.to_string())
        .replace(
            "DESCRIPTION_MAX_PLACEHOLDER",
            &settings.description_max_length.to_string(),
        )
}

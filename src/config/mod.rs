use config::{Config, ConfigError};
use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct DbConfig {
    pub location: String,
}

/// config properties for the external AI platform
#[derive(Deserialize, Clone)]
pub struct AiConfig {
    pub platform: String,
    pub model: String,
    /// `None` means generation cannot run; the pipeline refuses to start
    #[serde(rename = "apikey")]
    pub api_key: Option<String>,
}

/// the six prompt segments combined, in order, into the instruction text sent
/// with every image. Any blank segment is skipped
#[derive(Deserialize, Clone)]
pub struct PromptsConfig {
    #[serde(rename = "baseprompt")]
    pub base_prompt: String,
    #[serde(rename = "defaultprompt")]
    pub default_prompt: String,
    #[serde(rename = "customprompt")]
    pub custom_prompt: String,
    #[serde(rename = "negativeprompt")]
    pub negative_prompt: String,
    #[serde(rename = "excludeprompt")]
    pub exclude_prompt: String,
    #[serde(rename = "mandatoryprompt")]
    pub mandatory_prompt: String,
}

/// sizing values substituted into the prompt placeholders
#[derive(Deserialize, Clone)]
pub struct PromptSettingsConfig {
    #[serde(rename = "titleminlength")]
    pub title_min_length: u32,
    #[serde(rename = "titlemaxlength")]
    pub title_max_length: u32,
    #[serde(rename = "tagscount")]
    pub tags_count: u32,
    #[serde(rename = "descriptionmaxlength")]
    pub description_max_length: u32,
}

/// config properties for the whole of this application
#[derive(Deserialize, Clone)]
pub struct MediaCatalogConfig {
    pub database: DbConfig,
    pub ai: AiConfig,
    pub prompts: PromptsConfig,
    pub settings: PromptSettingsConfig,
}

/// Parses the config file located at ./MediaCatalog.toml, if it exists.
/// If this fails to parse the file, the application will panic
pub fn parse_config() -> MediaCatalogConfig {
    let builder = Config::builder()
        .add_source(config::File::with_name("./MediaCatalog.toml"))
        .build();
    // some errors are fine, such as not found
    if let Err(ConfigError::Foreign(e)) = builder {
        let message = e.to_string();
        if message.contains("not found") {
            log::warn!("No config file found. Continuing startup...");
            return MC_CONFIG_DEFAULT.clone();
        }
        panic!("Failed to parse config file. Exception is {e}");
        // basically everything else is unrecoverable, though
    } else if let Err(e) = builder {
        log::error!("Failed to parse config file. Exception is {e}");
        panic!("Failed to parse config file. Exception is {e}");
    }
    let settings = builder.unwrap();
    settings
        .try_deserialize()
        .unwrap_or(MC_CONFIG_DEFAULT.clone())
}

/// global variable for config, that way it doesn't need to be repeatedly parsed
pub static MEDIA_CATALOG_CONFIG: Lazy<MediaCatalogConfig> = Lazy::new(parse_config);
static MC_CONFIG_DEFAULT: Lazy<MediaCatalogConfig> = Lazy::new(|| MediaCatalogConfig {
    database: DbConfig {
        location: "./catalog.sqlite".to_string(),
    },
    ai: AiConfig {
        platform: "gemini".to_string(),
        model: "gemini-1.5-flash".to_string(),
        api_key: None,
    },
    prompts: PromptsConfig {
        base_prompt: String::new(),
        default_prompt: String::new(),
        custom_prompt: String::new(),
        negative_prompt: String::new(),
        exclude_prompt: String::new(),
        mandatory_prompt: String::new(),
    },
    settings: PromptSettingsConfig {
        title_min_length: 0,
        title_max_length: 0,
        tags_count: 0,
        description_max_length: 0,
    },
});

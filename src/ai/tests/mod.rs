mod prompt_tests {
    use crate::ai::prompt::build_final_prompt;
    use crate::config::{
        AiConfig, DbConfig, MediaCatalogConfig, PromptSettingsConfig, PromptsConfig,
    };

    fn config_with_prompts(prompts: PromptsConfig) -> MediaCatalogConfig {
        MediaCatalogConfig {
            database: DbConfig {
                location: String::from("./catalog.sqlite"),
            },
            ai: AiConfig {
                platform: String::from("gemini"),
                model: String::from("gemini-1.5-flash"),
                api_key: None,
            },
            prompts,
            settings: PromptSettingsConfig {
                title_min_length: 5,
                title_max_length: 15,
                tags_count: 10,
                description_max_length: 200,
            },
        }
    }

    fn blank_prompts() -> PromptsConfig {
        PromptsConfig {
            base_prompt: String::new(),
            default_prompt: String::new(),
            custom_prompt: String::new(),
            negative_prompt: String::new(),
            exclude_prompt: String::new(),
            mandatory_prompt: String::new(),
        }
    }

    #[test]
    fn segments_are_joined_in_order_with_their_prefixes() {
        let mut prompts = blank_prompts();
        prompts.base_prompt = String::from("Describe the image.");
        prompts.custom_prompt = String::from("Focus on cats");
        prompts.negative_prompt = String::from("blurry shots");
        prompts.exclude_prompt = String::from("people");
        prompts.mandatory_prompt = String::from("Respond in JSON.");
        let config = config_with_prompts(prompts);
        assert_eq!(
            "Describe the image.\n\nAdditional instructions: Focus on cats\n\nAvoid: blurry shots\n\nExclude: people\n\nRespond in JSON.",
            build_final_prompt(&config)
        );
    }

    #[test]
    fn blank_segments_are_skipped_rather_than_leaving_gaps() {
        let mut prompts = blank_prompts();
        prompts.default_prompt = String::from("   ");
        prompts.custom_prompt = String::from("Focus on the foreground.");
        let config = config_with_prompts(prompts);
        assert_eq!(
            "Additional instructions: Focus on the foreground.",
            build_final_prompt(&config)
        );
    }

    #[test]
    fn blank_segments_get_no_orphaned_prefix() {
        let mut prompts = blank_prompts();
        prompts.base_prompt = String::from("Describe the image.");
        prompts.negative_prompt = String::from("   ");
        let config = config_with_prompts(prompts);
        assert_eq!("Describe the image.", build_final_prompt(&config));
    }

    #[test]
    fn sizing_placeholders_are_filled_from_the_settings() {
        let mut prompts = blank_prompts();
        prompts.base_prompt = String::from(
            "Title of TITLE_LENGTH_PLACEHOLDER chars, KEYWORDS_COUNT_PLACEHOLDER keywords, description under DESCRIPTION_MAX_PLACEHOLDER.",
        );
        let config = config_with_prompts(prompts);
        assert_eq!(
            "Title of 5-15 chars, 10 keywords, description under 200.",
            build_final_prompt(&config)
        );
    }

    #[test]
    fn placeholders_are_left_alone_outside_the_content_segments() {
        let mut prompts = blank_prompts();
        prompts.mandatory_prompt = String::from("KEYWORDS_COUNT_PLACEHOLDER");
        let config = config_with_prompts(prompts);
        assert_eq!("KEYWORDS_COUNT_PLACEHOLDER", build_final_prompt(&config));
    }

    #[test]
    fn an_entirely_blank_config_falls_back_to_the_default_prompt() {
        let config = config_with_prompts(blank_prompts());
        assert_eq!(
            "Analyze this image and provide a detailed description in JSON format.",
            build_final_prompt(&config)
        );
    }
}

mod client_tests {
    use crate::ai::client_from_config;
    use crate::model::error::ai_errors::AiClientError;

    #[test]
    fn a_missing_api_key_refuses_to_build_a_client() {
        // no config file is present under test, so no key is configured
        let res = client_from_config();
        assert!(matches!(res, Err(AiClientError::MissingApiKey)));
    }
}

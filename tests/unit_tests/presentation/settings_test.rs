use std::time::Duration;

use brand_guardian::infrastructure::observability::DEFAULT_DIRECTIVES;
use brand_guardian::infrastructure::video::{DEFAULT_API_BASE_URL, DEFAULT_MANAGEMENT_BASE_URL};
use brand_guardian::presentation::{Environment, Settings};

#[test]
fn given_default_settings_when_created_then_pipeline_defaults_apply() {
    let settings = Settings::default();

    assert_eq!(settings.pipeline.poll_interval(), Duration::from_secs(30));
    assert_eq!(settings.pipeline.poll_timeout(), Duration::from_secs(3600));
    assert!(settings.pipeline.work_dir.is_none());
    assert_eq!(settings.search.top_k, 3);
    assert_eq!(settings.search.content_field, "content");
    assert_eq!(settings.search.vector_field, "content_vector");
    assert_eq!(settings.search.api_version, "2023-11-01");
    assert_eq!(settings.openai.api_version, "2024-02-01");
    assert_eq!(settings.openai.temperature, 0.0);
}

#[test]
fn given_no_settings_file_when_loading_then_defaults_are_used() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.search.top_k, 3);
    assert_eq!(settings.pipeline.poll_interval_secs, 30);
}

#[test]
fn given_environment_names_when_parsed_then_case_insensitive() {
    assert_eq!(
        Environment::try_from("LOCAL".to_string()),
        Ok(Environment::Local)
    );
    assert_eq!(
        Environment::try_from("production".to_string()),
        Ok(Environment::Prod)
    );
    assert!(Environment::try_from("staging".to_string()).is_err());
}

#[test]
fn given_default_settings_when_created_then_video_indexer_endpoints_match_client_defaults() {
    let settings = Settings::default();

    assert_eq!(settings.video_indexer.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(
        settings.video_indexer.management_base_url,
        DEFAULT_MANAGEMENT_BASE_URL
    );
    assert_eq!(settings.video_indexer.location, "trial");
}

#[test]
fn given_json_logging_enabled_when_building_tracing_config_then_format_and_environment_follow_settings() {
    let mut settings = Settings::default();
    settings.logging.json = true;

    let config = settings.tracing_config(Environment::Prod);

    assert_eq!(config.environment, "Prod");
    assert!(config.json_format);
    assert_eq!(config.default_directives, DEFAULT_DIRECTIVES);
}

#[test]
fn given_default_settings_when_building_tracing_config_then_plain_text_output() {
    let config = Settings::default().tracing_config(Environment::Local);

    assert_eq!(config.environment, "Local");
    assert!(!config.json_format);
}

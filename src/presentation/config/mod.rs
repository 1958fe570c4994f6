mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LoggingSettings, OpenAiSettings, PipelineSettings, SearchSettings, ServerSettings, Settings,
    VideoIndexerSettings,
};

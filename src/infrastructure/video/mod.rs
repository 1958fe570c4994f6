mod azure_video_indexer;
mod yt_dlp_downloader;

pub use azure_video_indexer::{
    AzureVideoIndexer, AzureVideoIndexerConfig, DEFAULT_API_BASE_URL, DEFAULT_MANAGEMENT_BASE_URL,
    MANAGEMENT_API_VERSION,
};
pub use yt_dlp_downloader::YtDlpDownloader;

#![cfg(unix)]

use brand_guardian::application::ports::{DownloadError, VideoDownloader};
use brand_guardian::domain::VideoSource;
use brand_guardian::infrastructure::video::YtDlpDownloader;

fn source() -> VideoSource {
    VideoSource::parse("https://youtu.be/abc123").unwrap()
}

#[tokio::test]
async fn given_downloader_exiting_with_error_when_downloading_then_failed() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = YtDlpDownloader::new("false");

    let result = downloader
        .download(&source(), &dir.path().join("vid.mp4"))
        .await;

    assert!(matches!(result, Err(DownloadError::Failed(_))));
}

#[tokio::test]
async fn given_downloader_succeeding_without_output_when_downloading_then_failed() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = YtDlpDownloader::new("true");

    let result = downloader
        .download(&source(), &dir.path().join("vid.mp4"))
        .await;

    match result {
        Err(DownloadError::Failed(message)) => assert!(message.contains("no file written")),
        other => panic!("expected missing output failure, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn given_missing_executable_when_downloading_then_failed_names_program() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = YtDlpDownloader::new("/nonexistent/yt-dlp");

    let result = downloader
        .download(&source(), &dir.path().join("vid.mp4"))
        .await;

    match result {
        Err(DownloadError::Failed(message)) => assert!(message.contains("/nonexistent/yt-dlp")),
        other => panic!("expected spawn failure, got {:?}", other.map(|_| ())),
    }
}

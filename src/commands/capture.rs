use serde_json::Value;
use tauri::{command, AppHandle, Runtime};

use crate::error::Result;
use crate::models::{PictureOptions, RecordingOptions};
use crate::peer::ControlAction;
use crate::CameraViewExt;

#[command]
pub(crate) async fn take_picture<R: Runtime>(
    app: AppHandle<R>,
    view_id: String,
    options: Option<PictureOptions>,
) -> Result<Value> {
    app.camera_view()
        .manager()
        .take_picture(&view_id, options)
        .await
}

/// Resolves once recording stops, with the recorded file
#[command]
pub(crate) async fn record<R: Runtime>(
    app: AppHandle<R>,
    view_id: String,
    options: Option<RecordingOptions>,
) -> Result<Value> {
    app.camera_view().manager().record(&view_id, options).await
}

#[command]
pub(crate) async fn stop_recording<R: Runtime>(app: AppHandle<R>, view_id: String) -> Result<()> {
    app.camera_view()
        .manager()
        .control(&view_id, ControlAction::StopRecording)
        .await
}

#[command]
pub(crate) async fn pause_recording<R: Runtime>(app: AppHandle<R>, view_id: String) -> Result<()> {
    app.camera_view()
        .manager()
        .control(&view_id, ControlAction::PauseRecording)
        .await
}

#[command]
pub(crate) async fn resume_recording<R: Runtime>(app: AppHandle<R>, view_id: String) -> Result<()> {
    app.camera_view()
        .manager()
        .control(&view_id, ControlAction::ResumeRecording)
        .await
}

#[command]
pub(crate) async fn pause_preview<R: Runtime>(app: AppHandle<R>, view_id: String) -> Result<()> {
    app.camera_view()
        .manager()
        .control(&view_id, ControlAction::PausePreview)
        .await
}

#[command]
pub(crate) async fn resume_preview<R: Runtime>(app: AppHandle<R>, view_id: String) -> Result<()> {
    app.camera_view()
        .manager()
        .control(&view_id, ControlAction::ResumePreview)
        .await
}

/// Android only
#[command]
pub(crate) async fn get_supported_ratios<R: Runtime>(
    app: AppHandle<R>,
    view_id: String,
) -> Result<Vec<String>> {
    app.camera_view()
        .manager()
        .get_supported_ratios(&view_id)
        .await
}

/// `view_id` is required on Android and ignored elsewhere
#[command]
pub(crate) async fn get_camera_ids<R: Runtime>(
    app: AppHandle<R>,
    view_id: Option<String>,
) -> Result<Vec<Value>> {
    app.camera_view()
        .manager()
        .get_camera_ids(view_id.as_deref())
        .await
}

/// Android only
#[command]
pub(crate) async fn get_supported_preview_fps_range<R: Runtime>(
    app: AppHandle<R>,
    view_id: String,
) -> Result<Vec<Value>> {
    app.camera_view()
        .manager()
        .get_supported_preview_fps_range(&view_id)
        .await
}

#[command]
pub(crate) async fn get_available_picture_sizes<R: Runtime>(
    app: AppHandle<R>,
    view_id: String,
) -> Result<Vec<String>> {
    app.camera_view()
        .manager()
        .get_available_picture_sizes(&view_id)
        .await
}

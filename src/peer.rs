use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::NativeEvent;
use crate::models::{NativePictureOptions, NativeRecordingOptions};
use crate::permission::PermissionCollaborator;
use crate::props::NativeProps;
use crate::Result;

/// Receives events raised by an attached native view.
pub type NativeEventSink = Arc<dyn Fn(NativeEvent) + Send + Sync>;

/// Opaque reference to a native view that is currently attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraHandle(String);

impl CameraHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fire-and-forget commands that only need a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    StopRecording,
    PauseRecording,
    ResumeRecording,
    PausePreview,
    ResumePreview,
}

impl ControlAction {
    pub fn method_name(self) -> &'static str {
        match self {
            ControlAction::StopRecording => "stopRecording",
            ControlAction::PauseRecording => "pauseRecording",
            ControlAction::ResumeRecording => "resumeRecording",
            ControlAction::PausePreview => "pausePreview",
            ControlAction::ResumePreview => "resumePreview",
        }
    }
}

/// The platform camera implementation. Everything past this trait (frame
/// pipeline, encoders, detectors, OS prompts) is owned by the native side.
pub trait NativePeer: PermissionCollaborator {
    fn attach(
        &self,
        view_id: &str,
        props: &NativeProps,
        events: NativeEventSink,
    ) -> impl Future<Output = Result<CameraHandle>> + Send;

    fn update_props(
        &self,
        handle: &CameraHandle,
        props: &NativeProps,
    ) -> impl Future<Output = Result<()>> + Send;

    fn detach(&self, handle: &CameraHandle) -> impl Future<Output = Result<()>> + Send;

    fn take_picture(
        &self,
        handle: &CameraHandle,
        options: &NativePictureOptions,
    ) -> impl Future<Output = Result<Value>> + Send;

    fn record(
        &self,
        handle: &CameraHandle,
        options: &NativeRecordingOptions,
    ) -> impl Future<Output = Result<Value>> + Send;

    fn control(
        &self,
        handle: &CameraHandle,
        action: ControlAction,
    ) -> impl Future<Output = Result<()>> + Send;

    fn get_supported_ratios(
        &self,
        handle: &CameraHandle,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn get_camera_ids(
        &self,
        handle: Option<&CameraHandle>,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;

    fn get_supported_preview_fps_range(
        &self,
        handle: &CameraHandle,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;

    fn get_available_picture_sizes(
        &self,
        ratio: Option<&str>,
        handle: &CameraHandle,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::NativeConstants;
use crate::events::EventKind;
use crate::permission::AuthorizationStatus;
use crate::props::CameraProps;
use crate::render::{RenderKind, Rendered, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Auto,
    LandscapeLeft,
    LandscapeRight,
    Portrait,
    PortraitUpsideDown,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Auto => "auto",
            Orientation::LandscapeLeft => "landscapeLeft",
            Orientation::LandscapeRight => "landscapeRight",
            Orientation::Portrait => "portrait",
            Orientation::PortraitUpsideDown => "portraitUpsideDown",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureOptions {
    pub quality: Option<f64>,
    pub orientation: Option<Orientation>,
    pub base64: Option<bool>,
    pub mirror_image: Option<bool>,
    pub exif: Option<bool>,
    pub write_exif: Option<Value>,
    pub width: Option<u32>,
    pub fix_orientation: Option<bool>,
    pub force_up_orientation: Option<bool>,
    pub pause_after_capture: Option<bool>,
}

// Picture options as the native side receives them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativePictureOptions {
    pub quality: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_image: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_exif: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_orientation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_up_orientation: Option<bool>,
    pub pause_after_capture: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingOptions {
    pub max_duration: Option<f64>,
    pub max_file_size: Option<u64>,
    pub orientation: Option<Orientation>,
    /// Native code, or a name from the `VideoQuality` constants.
    pub quality: Option<Value>,
    pub fps: Option<u32>,
    pub codec: Option<String>,
    pub mute: Option<bool>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeRecordingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// Request to mount a camera view
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MountRequest {
    pub props: CameraProps,
    pub events: Vec<EventKind>,
    pub render: RenderKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub view_id: String,
    pub props: CameraProps,
    /// Keeps the current subscriptions when absent.
    pub events: Option<Vec<EventKind>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub view_id: String,
    pub status: AuthorizationStatus,
    pub view: Rendered<Slot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantsResponse {
    #[serde(flatten)]
    pub constants: NativeConstants,
    pub camera_status: Vec<AuthorizationStatus>,
}

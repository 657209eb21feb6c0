use std::marker::PhantomData;

use serde_json::Value;
use tauri::{plugin::PluginApi, AppHandle, Runtime};

use crate::bridge::CameraBridge;
use crate::config::Config;
use crate::constants::NativeConstants;
use crate::error::{Error, Result};
use crate::manager::CameraManager;
use crate::models::{NativePictureOptions, NativeRecordingOptions};
use crate::peer::{CameraHandle, ControlAction, NativeEventSink, NativePeer};
use crate::permission::{PermissionCollaborator, PermissionRequest};
use crate::props::NativeProps;

pub fn init<R: Runtime>(
    _app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> Result<CameraView<R>> {
    let config = api.config().clone().unwrap_or_default();
    let bridge = CameraBridge::new(DesktopPeer, NativeConstants::builtin(), &config);
    Ok(CameraView {
        manager: CameraManager::new(bridge),
        _runtime: PhantomData,
    })
}

/// Access to the camera view APIs.
pub struct CameraView<R: Runtime> {
    manager: CameraManager<DesktopPeer>,
    _runtime: PhantomData<fn() -> R>,
}

impl<R: Runtime> CameraView<R> {
    pub fn manager(&self) -> &CameraManager<DesktopPeer> {
        &self.manager
    }
}

fn unavailable() -> Error {
    Error::Native("no native camera view is available on desktop".into())
}

/// Desktop webviews have no native camera view to drive. Permission is
/// granted so the view can try to mount, and the mount fails visibly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPeer;

impl PermissionCollaborator for DesktopPeer {
    async fn request_permissions(&self, request: &PermissionRequest) -> Result<bool> {
        log::debug!(
            "Granting camera permission on desktop (audio: {})",
            request.needs_audio
        );
        Ok(true)
    }
}

impl NativePeer for DesktopPeer {
    async fn attach(
        &self,
        _view_id: &str,
        _props: &NativeProps,
        _events: NativeEventSink,
    ) -> Result<CameraHandle> {
        Err(unavailable())
    }

    async fn update_props(&self, _handle: &CameraHandle, _props: &NativeProps) -> Result<()> {
        Err(unavailable())
    }

    async fn detach(&self, _handle: &CameraHandle) -> Result<()> {
        Ok(())
    }

    async fn take_picture(
        &self,
        _handle: &CameraHandle,
        _options: &NativePictureOptions,
    ) -> Result<Value> {
        Err(unavailable())
    }

    async fn record(
        &self,
        _handle: &CameraHandle,
        _options: &NativeRecordingOptions,
    ) -> Result<Value> {
        Err(unavailable())
    }

    async fn control(&self, _handle: &CameraHandle, _action: ControlAction) -> Result<()> {
        Err(unavailable())
    }

    async fn get_supported_ratios(&self, _handle: &CameraHandle) -> Result<Vec<String>> {
        Err(unavailable())
    }

    async fn get_camera_ids(&self, _handle: Option<&CameraHandle>) -> Result<Vec<Value>> {
        Err(unavailable())
    }

    async fn get_supported_preview_fps_range(&self, _handle: &CameraHandle) -> Result<Vec<Value>> {
        Err(unavailable())
    }

    async fn get_available_picture_sizes(
        &self,
        _ratio: Option<&str>,
        _handle: &CameraHandle,
    ) -> Result<Vec<String>> {
        Err(unavailable())
    }
}

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

pub use models::*;

#[cfg(desktop)]
mod desktop;
#[cfg(mobile)]
mod mobile;

mod bridge;
mod commands;
mod config;
mod constants;
mod error;
mod events;
mod manager;
mod models;
mod peer;
mod permission;
mod platform;
mod props;
mod render;
mod throttle;

#[cfg(test)]
mod testing;

pub use bridge::CameraBridge;
pub use config::Config;
pub use constants::{ConstantTable, FaceDetectionConstants, NativeConstants, VisionBarcodeConstants};
pub use error::{Error, Result};
pub use events::{CameraEvent, EventKind, EventRouter, EventSink, NativeEvent, Point, Subscriptions};
pub use manager::CameraManager;
pub use peer::{CameraHandle, ControlAction, NativeEventSink, NativePeer};
pub use permission::{
    AuthorizationStatus, Liveness, PermissionCollaborator, PermissionGate, PermissionRequest,
};
pub use platform::Platform;
pub use props::{
    CameraProps, Capabilities, Capability, ConversionTables, NativeProps, PropTranslator,
};
pub use render::{RenderKind, RenderMode, Rendered, Slot};
pub use throttle::{EventThrottle, EVENT_THROTTLE};

#[cfg(desktop)]
pub use desktop::{CameraView, DesktopPeer};
#[cfg(mobile)]
pub use mobile::{CameraView, MobilePeer};

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the camera view APIs.
pub trait CameraViewExt<R: Runtime> {
    fn camera_view(&self) -> &CameraView<R>;
}

impl<R: Runtime, T: Manager<R>> crate::CameraViewExt<R> for T {
    fn camera_view(&self) -> &CameraView<R> {
        self.state::<CameraView<R>>().inner()
    }
}

/// Initializes the plugin.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("camera-view")
        .invoke_handler(tauri::generate_handler![
            commands::camera::get_constants,
            commands::camera::mount_camera,
            commands::camera::update_camera,
            commands::camera::unmount_camera,
            commands::camera::get_camera_status,
            commands::capture::take_picture,
            commands::capture::record,
            commands::capture::stop_recording,
            commands::capture::pause_recording,
            commands::capture::resume_recording,
            commands::capture::pause_preview,
            commands::capture::resume_preview,
            commands::capture::get_supported_ratios,
            commands::capture::get_camera_ids,
            commands::capture::get_supported_preview_fps_range,
            commands::capture::get_available_picture_sizes,
        ])
        .setup(|app, api| {
            #[cfg(mobile)]
            let camera = mobile::init(app, api)?;
            #[cfg(desktop)]
            let camera = desktop::init(app, api)?;
            app.manage(camera);
            Ok(())
        })
        .build()
}

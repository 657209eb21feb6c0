use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tauri::{
    ipc::{Channel, InvokeResponseBody},
    plugin::{PluginApi, PluginHandle},
    AppHandle, Runtime,
};

use crate::bridge::CameraBridge;
use crate::config::Config;
use crate::constants::NativeConstants;
use crate::error::Result;
use crate::events::NativeEvent;
use crate::manager::CameraManager;
use crate::models::{NativePictureOptions, NativeRecordingOptions};
use crate::peer::{CameraHandle, ControlAction, NativeEventSink, NativePeer};
use crate::permission::{PermissionCollaborator, PermissionRequest};
use crate::props::NativeProps;

#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_camera_view);

pub fn init<R: Runtime>(
    _app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> Result<CameraView<R>> {
    let config = api.config().clone().unwrap_or_default();
    #[cfg(target_os = "android")]
    let handle = api.register_android_plugin("app.tauri.cameraview", "CameraViewPlugin")?;
    #[cfg(target_os = "ios")]
    let handle = api.register_ios_plugin(init_plugin_camera_view)?;

    let constants: NativeConstants = handle.run_mobile_plugin("getConstants", ())?;
    let bridge = CameraBridge::new(MobilePeer { handle }, constants, &config);
    Ok(CameraView {
        manager: CameraManager::new(bridge),
    })
}

/// Access to the camera view APIs.
pub struct CameraView<R: Runtime> {
    manager: CameraManager<MobilePeer<R>>,
}

impl<R: Runtime> CameraView<R> {
    pub fn manager(&self) -> &CameraManager<MobilePeer<R>> {
        &self.manager
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachArgs<'a> {
    view_id: &'a str,
    props: &'a NativeProps,
    on_event: Channel,
}

#[derive(Deserialize)]
struct AttachResponse {
    handle: CameraHandle,
}

#[derive(Serialize)]
struct HandleArgs<'a> {
    handle: &'a CameraHandle,
}

#[derive(Serialize)]
struct PropsArgs<'a> {
    handle: &'a CameraHandle,
    props: &'a NativeProps,
}

#[derive(Serialize)]
struct OptionsArgs<'a, T> {
    handle: &'a CameraHandle,
    options: &'a T,
}

#[derive(Serialize)]
struct CameraIdsArgs<'a> {
    handle: Option<&'a CameraHandle>,
}

#[derive(Serialize)]
struct PictureSizesArgs<'a> {
    handle: &'a CameraHandle,
    ratio: Option<&'a str>,
}

#[derive(Deserialize)]
struct Granted {
    granted: bool,
}

/// The Kotlin/Swift camera module behind the plugin handle.
pub struct MobilePeer<R: Runtime> {
    handle: PluginHandle<R>,
}

impl<R: Runtime> MobilePeer<R> {
    async fn invoke<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: impl Serialize,
    ) -> Result<T> {
        log::debug!("Calling native camera method {}", method);
        Ok(self.handle.run_mobile_plugin_async(method, payload).await?)
    }
}

impl<R: Runtime> PermissionCollaborator for MobilePeer<R> {
    async fn request_permissions(&self, request: &PermissionRequest) -> Result<bool> {
        let response: Granted = self.invoke("requestPermissions", request).await?;
        Ok(response.granted)
    }
}

impl<R: Runtime> NativePeer for MobilePeer<R> {
    async fn attach(
        &self,
        view_id: &str,
        props: &NativeProps,
        events: NativeEventSink,
    ) -> Result<CameraHandle> {
        let on_event: Channel = Channel::new(move |body: InvokeResponseBody| {
            match body.deserialize::<NativeEvent>() {
                Ok(event) => events(event),
                Err(e) => log::warn!("Dropping unreadable native camera event: {}", e),
            }
            Ok(())
        });
        let response: AttachResponse = self.invoke(
            "attach",
            AttachArgs {
                view_id,
                props,
                on_event,
            },
        )
        .await?;
        Ok(response.handle)
    }

    async fn update_props(&self, handle: &CameraHandle, props: &NativeProps) -> Result<()> {
        let _: Value = self.invoke("updateProps", PropsArgs { handle, props }).await?;
        Ok(())
    }

    async fn detach(&self, handle: &CameraHandle) -> Result<()> {
        let _: Value = self.invoke("detach", HandleArgs { handle }).await?;
        Ok(())
    }

    async fn take_picture(
        &self,
        handle: &CameraHandle,
        options: &NativePictureOptions,
    ) -> Result<Value> {
        self.invoke("takePicture", OptionsArgs { handle, options }).await
    }

    async fn record(
        &self,
        handle: &CameraHandle,
        options: &NativeRecordingOptions,
    ) -> Result<Value> {
        self.invoke("record", OptionsArgs { handle, options }).await
    }

    async fn control(&self, handle: &CameraHandle, action: ControlAction) -> Result<()> {
        let _: Value = self.invoke(action.method_name(), HandleArgs { handle }).await?;
        Ok(())
    }

    async fn get_supported_ratios(&self, handle: &CameraHandle) -> Result<Vec<String>> {
        self.invoke("getSupportedRatios", HandleArgs { handle }).await
    }

    async fn get_camera_ids(&self, handle: Option<&CameraHandle>) -> Result<Vec<Value>> {
        self.invoke("getCameraIds", CameraIdsArgs { handle }).await
    }

    async fn get_supported_preview_fps_range(&self, handle: &CameraHandle) -> Result<Vec<Value>> {
        self.invoke("getSupportedPreviewFpsRange", HandleArgs { handle })
            .await
    }

    async fn get_available_picture_sizes(
        &self,
        ratio: Option<&str>,
        handle: &CameraHandle,
    ) -> Result<Vec<String>> {
        self.invoke(
            "getAvailablePictureSizes",
            PictureSizesArgs { handle, ratio },
        )
        .await
    }
}

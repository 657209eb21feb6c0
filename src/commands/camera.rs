use std::sync::Arc;

use tauri::{command, ipc::Channel, AppHandle, Runtime};

use crate::error::Result;
use crate::events::{CameraEvent, EventSink};
use crate::models::{ConstantsResponse, MountRequest, UpdateRequest, ViewState};
use crate::permission::AuthorizationStatus;
use crate::CameraViewExt;

/// Native enumerations plus the status names a view can report
#[command]
pub(crate) async fn get_constants<R: Runtime>(app: AppHandle<R>) -> Result<ConstantsResponse> {
    Ok(ConstantsResponse {
        constants: app.camera_view().manager().bridge().constants().clone(),
        camera_status: AuthorizationStatus::ALL.to_vec(),
    })
}

/// Mount a camera view and start its permission request.
/// Status changes and subscribed callbacks are delivered on `on_event`.
#[command]
pub(crate) async fn mount_camera<R: Runtime>(
    app: AppHandle<R>,
    request: MountRequest,
    on_event: Channel<CameraEvent>,
) -> Result<ViewState> {
    let manager = app.camera_view().manager().clone();
    let sink: EventSink = Arc::new(move |event| {
        if let Err(e) = on_event.send(event) {
            log::warn!("Failed to deliver camera event: {}", e);
        }
    });

    let state = manager
        .mount(request.props, request.events, request.render, sink)
        .await?;

    let view_id = state.view_id.clone();
    tauri::async_runtime::spawn(async move {
        if let Err(e) = manager.authorize(&view_id).await {
            log::warn!("Authorization of camera view {} failed: {}", view_id, e);
        }
    });

    Ok(state)
}

#[command]
pub(crate) async fn update_camera<R: Runtime>(
    app: AppHandle<R>,
    request: UpdateRequest,
) -> Result<ViewState> {
    app.camera_view()
        .manager()
        .update(&request.view_id, request.props, request.events)
        .await
}

#[command]
pub(crate) async fn unmount_camera<R: Runtime>(app: AppHandle<R>, view_id: String) -> Result<()> {
    app.camera_view().manager().unmount(&view_id).await
}

#[command]
pub(crate) async fn get_camera_status<R: Runtime>(
    app: AppHandle<R>,
    view_id: String,
) -> Result<ViewState> {
    app.camera_view().manager().view_state(&view_id).await
}

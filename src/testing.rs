//! Test doubles for the native peer and the permission prompt.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::events::{CameraEvent, EventSink, NativeEvent};
use crate::models::{NativePictureOptions, NativeRecordingOptions};
use crate::peer::{CameraHandle, ControlAction, NativeEventSink, NativePeer};
use crate::permission::{PermissionCollaborator, PermissionRequest};
use crate::props::NativeProps;

/// Collects what a router or manager emits.
#[derive(Clone, Default)]
pub struct RecordingSink(Arc<Mutex<Vec<CameraEvent>>>);

impl RecordingSink {
    pub fn sink(&self) -> EventSink {
        let events = self.0.clone();
        Arc::new(move |event| events.lock().unwrap().push(event))
    }

    pub fn events(&self) -> Vec<CameraEvent> {
        self.0.lock().unwrap().clone()
    }
}

enum Answer {
    Now(bool),
    Fail,
    Deferred(Mutex<Option<oneshot::Receiver<bool>>>),
}

pub struct ScriptedPermissions {
    answer: Answer,
    requests: Mutex<Vec<PermissionRequest>>,
}

impl ScriptedPermissions {
    fn with(answer: Answer) -> Self {
        Self {
            answer,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(granted: bool) -> Self {
        Self::with(Answer::Now(granted))
    }

    pub fn failing() -> Self {
        Self::with(Answer::Fail)
    }

    /// Answers once the returned sender fires.
    pub fn deferred() -> (Self, oneshot::Sender<bool>) {
        let (tx, rx) = oneshot::channel();
        (Self::with(Answer::Deferred(Mutex::new(Some(rx)))), tx)
    }

    pub fn requests(&self) -> Vec<PermissionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl PermissionCollaborator for ScriptedPermissions {
    async fn request_permissions(&self, request: &PermissionRequest) -> Result<bool> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.answer {
            Answer::Now(granted) => Ok(*granted),
            Answer::Fail => Err(Error::Native("permission prompt crashed".into())),
            Answer::Deferred(answer) => {
                let answer = answer.lock().unwrap().take();
                match answer {
                    Some(answer) => answer
                        .await
                        .map_err(|_| Error::Native("permission prompt dropped".into())),
                    None => Ok(false),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Attach(String, NativeProps),
    UpdateProps(CameraHandle, NativeProps),
    Detach(CameraHandle),
    TakePicture(CameraHandle, NativePictureOptions),
    Record(CameraHandle, NativeRecordingOptions),
    Control(CameraHandle, ControlAction),
    SupportedRatios(CameraHandle),
    CameraIds(Option<CameraHandle>),
    PreviewFpsRange(CameraHandle),
    PictureSizes(Option<String>, CameraHandle),
}

/// Records every call and hands back canned answers.
pub struct MockPeer {
    calls: Mutex<Vec<Call>>,
    sinks: Mutex<Vec<NativeEventSink>>,
    permissions: ScriptedPermissions,
    fail_attach: bool,
    held_attach: Mutex<Option<oneshot::Receiver<()>>>,
}

impl Default for MockPeer {
    fn default() -> Self {
        Self::with_permissions(ScriptedPermissions::answering(true))
    }
}

impl MockPeer {
    pub fn with_permissions(permissions: ScriptedPermissions) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sinks: Mutex::new(Vec::new()),
            permissions,
            fail_attach: false,
            held_attach: Mutex::new(None),
        }
    }

    /// The first attach completes only once the returned sender fires.
    pub fn holding_attach() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let peer = Self::default();
        *peer.held_attach.lock().unwrap() = Some(rx);
        (peer, tx)
    }

    pub fn failing_attach() -> Self {
        Self {
            fail_attach: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn permission_requests(&self) -> Vec<PermissionRequest> {
        self.permissions.requests()
    }

    /// Raises `event` on the most recently attached view.
    pub fn emit(&self, event: NativeEvent) {
        let sink = self.sinks.lock().unwrap().last().cloned();
        if let Some(sink) = sink {
            sink(event);
        }
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PermissionCollaborator for MockPeer {
    async fn request_permissions(&self, request: &PermissionRequest) -> Result<bool> {
        self.permissions.request_permissions(request).await
    }
}

impl NativePeer for MockPeer {
    async fn attach(
        &self,
        view_id: &str,
        props: &NativeProps,
        events: NativeEventSink,
    ) -> Result<CameraHandle> {
        self.record_call(Call::Attach(view_id.to_string(), props.clone()));
        let held = self.held_attach.lock().unwrap().take();
        if let Some(release) = held {
            let _ = release.await;
        }
        if self.fail_attach {
            return Err(Error::Native("camera busy".into()));
        }
        self.sinks.lock().unwrap().push(events);
        Ok(CameraHandle::new(format!("native-{view_id}")))
    }

    async fn update_props(&self, handle: &CameraHandle, props: &NativeProps) -> Result<()> {
        self.record_call(Call::UpdateProps(handle.clone(), props.clone()));
        Ok(())
    }

    async fn detach(&self, handle: &CameraHandle) -> Result<()> {
        self.record_call(Call::Detach(handle.clone()));
        Ok(())
    }

    async fn take_picture(
        &self,
        handle: &CameraHandle,
        options: &NativePictureOptions,
    ) -> Result<Value> {
        self.record_call(Call::TakePicture(handle.clone(), options.clone()));
        Ok(json!({ "uri": "file:///tmp/picture.jpg", "width": 4032, "height": 3024 }))
    }

    async fn record(&self, handle: &CameraHandle, options: &NativeRecordingOptions) -> Result<Value> {
        self.record_call(Call::Record(handle.clone(), options.clone()));
        Ok(json!({ "uri": "file:///tmp/video.mp4" }))
    }

    async fn control(&self, handle: &CameraHandle, action: ControlAction) -> Result<()> {
        self.record_call(Call::Control(handle.clone(), action));
        Ok(())
    }

    async fn get_supported_ratios(&self, handle: &CameraHandle) -> Result<Vec<String>> {
        self.record_call(Call::SupportedRatios(handle.clone()));
        Ok(vec!["4:3".into(), "16:9".into()])
    }

    async fn get_camera_ids(&self, handle: Option<&CameraHandle>) -> Result<Vec<Value>> {
        self.record_call(Call::CameraIds(handle.cloned()));
        Ok(vec![json!({ "id": "0", "type": 0 }), json!({ "id": "1", "type": 1 })])
    }

    async fn get_supported_preview_fps_range(&self, handle: &CameraHandle) -> Result<Vec<Value>> {
        self.record_call(Call::PreviewFpsRange(handle.clone()));
        Ok(vec![json!({ "MINIMUM_FPS": 15, "MAXIMUM_FPS": 30 })])
    }

    async fn get_available_picture_sizes(
        &self,
        ratio: Option<&str>,
        handle: &CameraHandle,
    ) -> Result<Vec<String>> {
        self.record_call(Call::PictureSizes(ratio.map(str::to_string), handle.clone()));
        Ok(vec!["1920x1080".into()])
    }
}

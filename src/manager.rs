use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use serde_json::{json, Value};
use tokio::sync::Mutex as AsyncMutex;

use crate::bridge::CameraBridge;
use crate::error::{Error, Result};
use crate::events::{CameraEvent, EventKind, EventRouter, EventSink, NativeEvent, Subscriptions};
use crate::models::{PictureOptions, RecordingOptions, ViewState};
use crate::peer::{CameraHandle, ControlAction, NativeEventSink, NativePeer};
use crate::permission::{self, AuthorizationStatus, PermissionGate, PermissionRequest};
use crate::props::{CameraProps, NativeProps};
use crate::render::{RenderKind, RenderMode, Rendered, Slot};

fn lock_router(router: &Mutex<EventRouter>) -> MutexGuard<'_, EventRouter> {
    router.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Where a view stands with its native camera.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Attachment {
    Detached,
    Attaching,
    Attached(CameraHandle),
    /// The native view could not mount. Reported once and never retried.
    Failed,
}

impl Attachment {
    fn handle(&self) -> Option<&CameraHandle> {
        match self {
            Attachment::Attached(handle) => Some(handle),
            _ => None,
        }
    }
}

/// State of one mounted camera view.
struct ViewEntry {
    props: CameraProps,
    mode: RenderMode<Slot>,
    gate: PermissionGate,
    attachment: Attachment,
    router: Arc<Mutex<EventRouter>>,
}

impl ViewEntry {
    fn subscriptions(&self) -> Subscriptions {
        lock_router(&self.router).subscriptions().clone()
    }

    fn emit(&self, event: CameraEvent) {
        lock_router(&self.router).emit(event);
    }
}

/// Native work decided under the registry lock and run after releasing it.
enum NativeWork {
    Attach(PendingAttach),
    Update(CameraHandle, NativeProps),
}

struct PendingAttach {
    props: NativeProps,
    router: Arc<Mutex<EventRouter>>,
}

/// Registry of mounted views. Wires each view's permission gate, props and
/// event router to the shared bridge.
pub struct CameraManager<P> {
    bridge: Arc<CameraBridge<P>>,
    views: Arc<AsyncMutex<HashMap<String, ViewEntry>>>,
}

impl<P> Clone for CameraManager<P> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
            views: self.views.clone(),
        }
    }
}

impl<P: NativePeer + 'static> CameraManager<P> {
    pub fn new(bridge: CameraBridge<P>) -> Self {
        Self {
            bridge: Arc::new(bridge),
            views: Arc::new(AsyncMutex::new(HashMap::new())),
        }
    }

    pub fn bridge(&self) -> &CameraBridge<P> {
        &self.bridge
    }

    fn render(&self, entry: &ViewEntry) -> Rendered<Slot> {
        let capabilities = entry.subscriptions().capabilities();
        entry.mode.render(entry.gate.status(), entry.attachment.handle(), || {
            self.bridge.translate(&entry.props, &capabilities)
        })
    }

    fn state(&self, view_id: &str, entry: &ViewEntry) -> ViewState {
        ViewState {
            view_id: view_id.to_string(),
            status: entry.gate.status(),
            view: self.render(entry),
        }
    }

    fn native_props(&self, entry: &ViewEntry) -> NativeProps {
        self.bridge.translate(&entry.props, &entry.subscriptions().capabilities())
    }

    /// Claims the native attach once the render decision shows the camera.
    /// Only a detached view is claimed, so a failed mount stays failed.
    fn claim_attach(&self, entry: &mut ViewEntry) -> Option<PendingAttach> {
        let shown = entry.mode.shows_camera(entry.gate.status());
        if entry.attachment != Attachment::Detached || !shown {
            return None;
        }
        entry.attachment = Attachment::Attaching;
        Some(PendingAttach {
            props: self.native_props(entry),
            router: entry.router.clone(),
        })
    }

    async fn attach(&self, view_id: &str, pending: PendingAttach) -> Attachment {
        let router = pending.router.clone();
        let events: NativeEventSink =
            Arc::new(move |event| lock_router(&router).route(event, Instant::now()));

        match self.bridge.peer().attach(view_id, &pending.props, events).await {
            Ok(handle) => {
                log::info!("Attached native camera {} to view {}", handle.as_str(), view_id);
                Attachment::Attached(handle)
            }
            Err(e) => {
                let error = json!({ "message": e.to_string() });
                lock_router(&pending.router).route(NativeEvent::MountError(error), Instant::now());
                Attachment::Failed
            }
        }
    }

    /// Stores the attach result. A view unmounted meanwhile gets its native
    /// camera detached again.
    async fn settle_attach<'a>(
        &self,
        views: &'a mut HashMap<String, ViewEntry>,
        view_id: &str,
        attachment: Attachment,
    ) -> Option<&'a mut ViewEntry> {
        match views.get_mut(view_id) {
            Some(entry) => {
                entry.attachment = attachment;
                Some(entry)
            }
            None => {
                if let Attachment::Attached(handle) = attachment {
                    log::warn!("Camera view {} unmounted while attaching", view_id);
                    if let Err(e) = self.bridge.peer().detach(&handle).await {
                        log::warn!("Failed to detach orphaned camera {}: {}", handle.as_str(), e);
                    }
                }
                None
            }
        }
    }

    pub async fn mount(
        &self,
        props: CameraProps,
        events: Vec<EventKind>,
        render: RenderKind,
        sink: EventSink,
    ) -> Result<ViewState> {
        let view_id = uuid::Uuid::new_v4().to_string();
        let router = EventRouter::new(
            events.into_iter().collect(),
            self.bridge.throttle_window(),
            sink,
        );
        let mut entry = ViewEntry {
            props,
            mode: render.into_mode(),
            gate: PermissionGate::new(),
            attachment: Attachment::Detached,
            router: Arc::new(Mutex::new(router)),
        };

        if let Some(pending) = self.claim_attach(&mut entry) {
            entry.attachment = self.attach(&view_id, pending).await;
        }
        let state = self.state(&view_id, &entry);

        log::info!("Mounted camera view {}", view_id);
        self.views.lock().await.insert(view_id, entry);
        Ok(state)
    }

    /// Runs the view's one permission request and applies the answer.
    pub async fn authorize(&self, view_id: &str) -> Result<()> {
        let (liveness, request) = {
            let mut views = self.views.lock().await;
            let entry = views
                .get_mut(view_id)
                .ok_or_else(|| Error::ViewNotFound(view_id.to_string()))?;
            let Some(liveness) = entry.gate.begin() else {
                return Ok(());
            };
            let request = PermissionRequest::from_props(&self.bridge.resolve_props(&entry.props));
            (liveness, request)
        };

        let Some(granted) = permission::authorize(self.bridge.peer(), &request, &liveness).await
        else {
            return Ok(());
        };

        let (status, pending) = {
            let mut views = self.views.lock().await;
            let Some(entry) = views.get_mut(view_id) else {
                log::warn!("Camera view {} vanished before authorization applied", view_id);
                return Ok(());
            };
            let Some(status) = entry.gate.resolve(granted) else {
                return Ok(());
            };
            log::info!("Camera view {} is {}", view_id, status.as_str());
            (status, self.claim_attach(entry))
        };

        let attachment = match pending {
            Some(pending) => Some(self.attach(view_id, pending).await),
            None => None,
        };

        let mut views = self.views.lock().await;
        let entry = match attachment {
            Some(attachment) => self.settle_attach(&mut views, view_id, attachment).await,
            None => views.get_mut(view_id),
        };
        if let Some(entry) = entry {
            let view = self.render(entry);
            entry.emit(CameraEvent::StatusChanged { status, view });
        }
        Ok(())
    }

    pub async fn update(
        &self,
        view_id: &str,
        props: CameraProps,
        events: Option<Vec<EventKind>>,
    ) -> Result<ViewState> {
        let work = {
            let mut views = self.views.lock().await;
            let entry = views
                .get_mut(view_id)
                .ok_or_else(|| Error::ViewNotFound(view_id.to_string()))?;

            entry.props = props;
            if let Some(events) = events {
                lock_router(&entry.router).set_subscriptions(events.into_iter().collect());
            }

            match entry.attachment.handle().cloned() {
                Some(handle) => Some(NativeWork::Update(handle, self.native_props(entry))),
                None => self.claim_attach(entry).map(NativeWork::Attach),
            }
        };

        let attachment = match work {
            Some(NativeWork::Update(handle, native)) => {
                self.bridge.peer().update_props(&handle, &native).await?;
                None
            }
            Some(NativeWork::Attach(pending)) => Some(self.attach(view_id, pending).await),
            None => None,
        };

        let mut views = self.views.lock().await;
        let entry = match attachment {
            Some(attachment) => self.settle_attach(&mut views, view_id, attachment).await,
            None => views.get_mut(view_id),
        };
        let entry = entry.ok_or_else(|| Error::ViewNotFound(view_id.to_string()))?;
        Ok(self.state(view_id, entry))
    }

    pub async fn unmount(&self, view_id: &str) -> Result<()> {
        let entry = self
            .views
            .lock()
            .await
            .remove(view_id)
            .ok_or_else(|| Error::ViewNotFound(view_id.to_string()))?;

        entry.gate.unmount();
        if let Some(handle) = entry.attachment.handle() {
            self.bridge.peer().detach(handle).await?;
        }
        log::info!("Unmounted camera view {}", view_id);
        Ok(())
    }

    pub async fn view_state(&self, view_id: &str) -> Result<ViewState> {
        let views = self.views.lock().await;
        let entry = views
            .get(view_id)
            .ok_or_else(|| Error::ViewNotFound(view_id.to_string()))?;
        Ok(self.state(view_id, entry))
    }

    pub async fn status(&self, view_id: &str) -> Result<AuthorizationStatus> {
        Ok(self.view_state(view_id).await?.status)
    }

    async fn handle(&self, view_id: &str) -> Result<Option<CameraHandle>> {
        let views = self.views.lock().await;
        let entry = views
            .get(view_id)
            .ok_or_else(|| Error::ViewNotFound(view_id.to_string()))?;
        Ok(entry.attachment.handle().cloned())
    }

    pub async fn take_picture(
        &self,
        view_id: &str,
        options: Option<PictureOptions>,
    ) -> Result<Value> {
        let handle = self.handle(view_id).await?;
        self.bridge.take_picture(handle.as_ref(), options).await
    }

    pub async fn record(&self, view_id: &str, options: Option<RecordingOptions>) -> Result<Value> {
        let handle = self.handle(view_id).await?;
        self.bridge.record(handle.as_ref(), options).await
    }

    pub async fn control(&self, view_id: &str, action: ControlAction) -> Result<()> {
        let handle = self.handle(view_id).await?;
        self.bridge.control(handle.as_ref(), action).await
    }

    pub async fn get_supported_ratios(&self, view_id: &str) -> Result<Vec<String>> {
        let handle = self.handle(view_id).await?;
        self.bridge.get_supported_ratios(handle.as_ref()).await
    }

    /// Lists camera ids. `view_id` may be omitted where the platform does not
    /// need a live camera for this.
    pub async fn get_camera_ids(&self, view_id: Option<&str>) -> Result<Vec<Value>> {
        let handle = match view_id {
            Some(view_id) => self.handle(view_id).await?,
            None => None,
        };
        self.bridge.get_camera_ids(handle.as_ref()).await
    }

    pub async fn get_supported_preview_fps_range(&self, view_id: &str) -> Result<Vec<Value>> {
        let handle = self.handle(view_id).await?;
        self.bridge.get_supported_preview_fps_range(handle.as_ref()).await
    }

    /// Picture sizes available for the view's current `ratio`.
    pub async fn get_available_picture_sizes(&self, view_id: &str) -> Result<Vec<String>> {
        let (handle, ratio) = {
            let views = self.views.lock().await;
            let entry = views
                .get(view_id)
                .ok_or_else(|| Error::ViewNotFound(view_id.to_string()))?;
            let ratio = self
                .bridge
                .resolve_props(&entry.props)
                .get("ratio")
                .and_then(Value::as_str)
                .map(str::to_string);
            (entry.attachment.handle().cloned(), ratio)
        };
        self.bridge
            .get_available_picture_sizes(handle.as_ref(), ratio.as_deref())
            .await
    }
}

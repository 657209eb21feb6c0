//! Events coming up from the native view and the callbacks the application
//! subscribes to.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::permission::AuthorizationStatus;
use crate::props::{Capabilities, Capability};
use crate::render::{Rendered, Slot};
use crate::throttle::EventThrottle;

/// Receives every event meant for the application.
pub type EventSink = Arc<dyn Fn(CameraEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Callbacks an application can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    CameraReady,
    MountError,
    AudioInterrupted,
    AudioConnected,
    Tap,
    DoubleTap,
    PictureSaved,
    RecordingStart,
    RecordingEnd,
    SubjectAreaChanged,
    BarCodeRead,
    GoogleVisionBarcodesDetected,
    FacesDetected,
    TextRecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions(HashSet<EventKind>);

impl Subscriptions {
    pub fn contains(&self, kind: EventKind) -> bool {
        self.0.contains(&kind)
    }

    /// Native features needed to produce the subscribed events.
    pub fn capabilities(&self) -> Capabilities {
        let mut capabilities = Capabilities::default();
        if self.contains(EventKind::BarCodeRead) {
            capabilities.insert(Capability::BarCodeScanner);
        }
        if self.contains(EventKind::GoogleVisionBarcodesDetected) {
            capabilities.insert(Capability::GoogleVisionBarcodeDetector);
        }
        if self.contains(EventKind::FacesDetected) {
            capabilities.insert(Capability::FaceDetector);
        }
        if self.contains(EventKind::TextRecognized) {
            capabilities.insert(Capability::TextRecognizer);
        }
        if self.contains(EventKind::Tap) || self.contains(EventKind::DoubleTap) {
            capabilities.insert(Capability::TouchDetector);
        }
        capabilities
    }
}

impl FromIterator<EventKind> for Subscriptions {
    fn from_iter<I: IntoIterator<Item = EventKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Event delivered by the native view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum NativeEvent {
    CameraReady,
    MountError(Value),
    AudioInterrupted,
    AudioConnected,
    #[serde(rename_all = "camelCase")]
    Touch {
        is_double_tap: bool,
        touch_origin: Point,
    },
    PictureSaved(Value),
    RecordingStart(Value),
    RecordingEnd(Value),
    SubjectAreaChanged(Value),
    BarCodeRead(Value),
    GoogleVisionBarcodesDetected(Value),
    FacesDetected(Value),
    TextRecognized(Value),
}

/// Event delivered to the application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum CameraEvent {
    StatusChanged {
        status: AuthorizationStatus,
        view: Rendered<Slot>,
    },
    CameraReady,
    MountError(Value),
    AudioInterrupted,
    AudioConnected,
    Tap(Point),
    DoubleTap(Point),
    PictureSaved(Value),
    RecordingStart(Value),
    RecordingEnd(Value),
    SubjectAreaChanged(Value),
    BarCodeRead(Value),
    GoogleVisionBarcodesDetected(Value),
    FacesDetected(Value),
    TextRecognized(Value),
}

/// Detector outputs that go through the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionKind {
    BarCode,
    GoogleVisionBarcodes,
    Faces,
    Text,
}

impl DetectionKind {
    fn subscription(self) -> EventKind {
        match self {
            DetectionKind::BarCode => EventKind::BarCodeRead,
            DetectionKind::GoogleVisionBarcodes => EventKind::GoogleVisionBarcodesDetected,
            DetectionKind::Faces => EventKind::FacesDetected,
            DetectionKind::Text => EventKind::TextRecognized,
        }
    }

    fn wrap(self, payload: Value) -> CameraEvent {
        match self {
            DetectionKind::BarCode => CameraEvent::BarCodeRead(payload),
            DetectionKind::GoogleVisionBarcodes => CameraEvent::GoogleVisionBarcodesDetected(payload),
            DetectionKind::Faces => CameraEvent::FacesDetected(payload),
            DetectionKind::Text => CameraEvent::TextRecognized(payload),
        }
    }
}

/// Filters native events against the subscriptions of one view, throttles
/// detector output and forwards the rest to the application.
pub struct EventRouter {
    subscriptions: Subscriptions,
    throttle: EventThrottle<DetectionKind>,
    sink: EventSink,
}

impl EventRouter {
    pub fn new(subscriptions: Subscriptions, window: Duration, sink: EventSink) -> Self {
        Self {
            subscriptions,
            throttle: EventThrottle::new(window),
            sink,
        }
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn set_subscriptions(&mut self, subscriptions: Subscriptions) {
        self.subscriptions = subscriptions;
    }

    pub fn emit(&self, event: CameraEvent) {
        (self.sink)(event);
    }

    fn emit_if(&self, kind: EventKind, event: CameraEvent) {
        if self.subscriptions.contains(kind) {
            self.emit(event);
        }
    }

    pub fn route(&mut self, event: NativeEvent, now: Instant) {
        match event {
            NativeEvent::CameraReady => self.emit_if(EventKind::CameraReady, CameraEvent::CameraReady),
            NativeEvent::MountError(error) => {
                log::error!("Native camera failed to mount: {}", error);
                self.emit_if(EventKind::MountError, CameraEvent::MountError(error));
            }
            NativeEvent::AudioInterrupted => {
                self.emit_if(EventKind::AudioInterrupted, CameraEvent::AudioInterrupted)
            }
            NativeEvent::AudioConnected => {
                self.emit_if(EventKind::AudioConnected, CameraEvent::AudioConnected)
            }
            NativeEvent::Touch {
                is_double_tap: false,
                touch_origin,
            } => self.emit_if(EventKind::Tap, CameraEvent::Tap(touch_origin)),
            NativeEvent::Touch {
                is_double_tap: true,
                touch_origin,
            } => self.emit_if(EventKind::DoubleTap, CameraEvent::DoubleTap(touch_origin)),
            NativeEvent::PictureSaved(data) => {
                self.emit_if(EventKind::PictureSaved, CameraEvent::PictureSaved(data))
            }
            NativeEvent::RecordingStart(data) => {
                self.emit_if(EventKind::RecordingStart, CameraEvent::RecordingStart(data))
            }
            NativeEvent::RecordingEnd(data) => {
                self.emit_if(EventKind::RecordingEnd, CameraEvent::RecordingEnd(data))
            }
            NativeEvent::SubjectAreaChanged(data) => self.emit_if(
                EventKind::SubjectAreaChanged,
                CameraEvent::SubjectAreaChanged(data),
            ),
            NativeEvent::BarCodeRead(data) => self.detect(DetectionKind::BarCode, data, now),
            NativeEvent::GoogleVisionBarcodesDetected(data) => {
                self.detect(DetectionKind::GoogleVisionBarcodes, data, now)
            }
            NativeEvent::FacesDetected(data) => self.detect(DetectionKind::Faces, data, now),
            NativeEvent::TextRecognized(data) => self.detect(DetectionKind::Text, data, now),
        }
    }

    fn detect(&mut self, kind: DetectionKind, payload: Value, now: Instant) {
        // no record is kept for kinds nobody listens to
        if !self.subscriptions.contains(kind.subscription()) {
            return;
        }
        let sink = &self.sink;
        let delivered = self
            .throttle
            .deliver(kind, &payload, now, |payload| sink(kind.wrap(payload.clone())));
        if !delivered {
            log::debug!("Suppressed duplicate {:?} event", kind);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_tracking(&self, kind: DetectionKind) -> bool {
        self.throttle.is_tracking(kind)
    }
}

impl fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("subscriptions", &self.subscriptions)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use crate::throttle::EVENT_THROTTLE;
    use serde_json::json;

    fn router(kinds: &[EventKind]) -> (EventRouter, RecordingSink) {
        let recorded = RecordingSink::default();
        let router = EventRouter::new(
            kinds.iter().copied().collect(),
            EVENT_THROTTLE,
            recorded.sink(),
        );
        (router, recorded)
    }

    #[test]
    fn test_capabilities_follow_subscriptions() {
        let subscriptions: Subscriptions = [EventKind::FacesDetected].into_iter().collect();
        let capabilities = subscriptions.capabilities();
        assert!(capabilities.contains(Capability::FaceDetector));
        assert_eq!(capabilities.iter().count(), 1);

        let touch: Subscriptions = [EventKind::DoubleTap].into_iter().collect();
        assert!(touch.capabilities().contains(Capability::TouchDetector));

        assert_eq!(Subscriptions::default().capabilities(), Capabilities::default());
    }

    #[test]
    fn test_native_event_wire_format() {
        let touch: NativeEvent = serde_json::from_value(json!({
            "event": "touch",
            "data": { "isDoubleTap": true, "touchOrigin": { "x": 1.0, "y": 2.0 } }
        }))
        .unwrap();
        assert_eq!(
            touch,
            NativeEvent::Touch {
                is_double_tap: true,
                touch_origin: Point { x: 1.0, y: 2.0 }
            }
        );

        let ready: NativeEvent = serde_json::from_value(json!({ "event": "cameraReady" })).unwrap();
        assert_eq!(ready, NativeEvent::CameraReady);
    }

    #[test]
    fn test_taps_are_split_by_kind() {
        let (mut router, recorded) = router(&[EventKind::Tap]);
        let origin = Point { x: 10.0, y: 20.0 };
        let now = Instant::now();

        router.route(
            NativeEvent::Touch {
                is_double_tap: false,
                touch_origin: origin,
            },
            now,
        );
        router.route(
            NativeEvent::Touch {
                is_double_tap: true,
                touch_origin: origin,
            },
            now,
        );

        assert_eq!(recorded.events(), vec![CameraEvent::Tap(origin)]);
    }

    #[test]
    fn test_unsubscribed_events_are_dropped() {
        let (mut router, recorded) = router(&[EventKind::CameraReady]);
        let now = Instant::now();

        router.route(NativeEvent::AudioConnected, now);
        router.route(NativeEvent::FacesDetected(json!({ "faces": [] })), now);
        router.route(NativeEvent::CameraReady, now);

        assert_eq!(recorded.events(), vec![CameraEvent::CameraReady]);
        assert!(!router.is_tracking(DetectionKind::Faces));
    }

    #[test]
    fn test_detections_are_throttled() {
        let (mut router, recorded) = router(&[EventKind::BarCodeRead, EventKind::FacesDetected]);
        let start = Instant::now();
        let barcode = json!({ "type": "barcode", "data": "4006381333931" });

        router.route(NativeEvent::BarCodeRead(barcode.clone()), start);
        router.route(
            NativeEvent::BarCodeRead(barcode.clone()),
            start + Duration::from_millis(100),
        );
        router.route(
            NativeEvent::FacesDetected(json!({ "faces": [] })),
            start + Duration::from_millis(120),
        );
        router.route(
            NativeEvent::BarCodeRead(barcode.clone()),
            start + Duration::from_millis(600),
        );

        assert_eq!(
            recorded.events(),
            vec![
                CameraEvent::BarCodeRead(barcode.clone()),
                CameraEvent::FacesDetected(json!({ "faces": [] })),
                CameraEvent::BarCodeRead(barcode),
            ]
        );
        assert!(router.is_tracking(DetectionKind::BarCode));
        assert!(!router.is_tracking(DetectionKind::Text));
    }

    #[test]
    fn test_recording_events_are_forwarded() {
        let (mut router, recorded) = router(&[EventKind::RecordingStart, EventKind::RecordingEnd]);
        let started: NativeEvent = serde_json::from_value(json!({
            "event": "recordingStart",
            "data": { "uri": "file:///video.mp4", "videoOrientation": 1, "deviceOrientation": 1 }
        }))
        .unwrap();
        let ended: NativeEvent =
            serde_json::from_value(json!({ "event": "recordingEnd", "data": null })).unwrap();
        let now = Instant::now();

        router.route(started, now);
        router.route(ended, now);

        let events = recorded.events();
        assert!(matches!(&events[0], CameraEvent::RecordingStart(data)
            if data["uri"] == json!("file:///video.mp4")));
        assert_eq!(events[1], CameraEvent::RecordingEnd(Value::Null));
    }

    #[test]
    fn test_mount_error_is_forwarded() {
        let (mut router, recorded) = router(&[EventKind::MountError]);
        let error = json!({ "message": "camera busy" });
        router.route(NativeEvent::MountError(error.clone()), Instant::now());
        assert_eq!(recorded.events(), vec![CameraEvent::MountError(error)]);
    }
}

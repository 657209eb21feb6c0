//! Translation of the declarative camera configuration into the props the
//! native view understands.

use std::collections::{BTreeSet, HashMap};

use serde_json::{json, Map, Value};

use crate::constants::{ConstantTable, NativeConstants};
use crate::platform::Platform;

/// Configuration supplied by the application, keyed by option name.
pub type CameraProps = Map<String, Value>;

/// Props handed to the native view after translation.
pub type NativeProps = Map<String, Value>;

/// Option that the iOS peer rejects.
const IOS_DROPPED_PROP: &str = "ratio";

/// Per-option lookup tables, built once from the peer's constants.
#[derive(Debug, Clone, Default)]
pub struct ConversionTables {
    tables: HashMap<&'static str, ConstantTable>,
}

impl ConversionTables {
    pub fn from_constants(constants: &NativeConstants) -> Self {
        let face = &constants.face_detection;
        let vision = &constants.google_vision_barcode_detection;
        let tables = [
            ("type", &constants.camera_type),
            ("flashMode", &constants.flash_mode),
            ("exposure", &constants.exposure),
            ("autoFocus", &constants.auto_focus),
            ("whiteBalance", &constants.white_balance),
            ("faceDetectionMode", &face.mode),
            ("faceDetectionLandmarks", &face.landmarks),
            ("faceDetectionClassifications", &face.classifications),
            ("googleVisionBarcodeType", &vision.barcode_type),
            ("googleVisionBarcodeMode", &vision.barcode_mode),
            ("videoStabilizationMode", &constants.video_stabilization),
        ]
        .into_iter()
        .map(|(key, table)| (key, table.clone()))
        .collect();

        Self { tables }
    }

    pub fn get(&self, key: &str) -> Option<&ConstantTable> {
        self.tables.get(key)
    }

    /// Replaces a textual value with its native code. Anything the table
    /// does not know about is passed through unchanged.
    pub fn convert(&self, key: &str, value: &Value) -> Value {
        match (value, self.tables.get(key)) {
            (Value::String(text), Some(table)) => {
                table.get(text).cloned().unwrap_or_else(|| value.clone())
            }
            _ => value.clone(),
        }
    }
}

/// Native features switched on by what the application listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    BarCodeScanner,
    GoogleVisionBarcodeDetector,
    FaceDetector,
    TextRecognizer,
    TouchDetector,
}

impl Capability {
    pub fn prop_name(self) -> &'static str {
        match self {
            Capability::BarCodeScanner => "barCodeScannerEnabled",
            Capability::GoogleVisionBarcodeDetector => "googleVisionBarcodeDetectorEnabled",
            Capability::FaceDetector => "faceDetectorEnabled",
            Capability::TextRecognizer => "textRecognizerEnabled",
            Capability::TouchDetector => "touchDetectorEnabled",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Defaults applied to options the application leaves out. Values that come
/// from native constants are skipped when the peer does not report them.
pub fn default_props(constants: &NativeConstants) -> CameraProps {
    let mut props = CameraProps::new();
    let fixed = [
        ("zoom", json!(0)),
        ("useNativeZoom", json!(false)),
        ("maxZoom", json!(0)),
        ("ratio", json!("4:3")),
        ("focusDepth", json!(0)),
        ("exposure", json!(-1)),
        ("permissionDialogTitle", json!("")),
        ("permissionDialogMessage", json!("")),
        ("captureAudio", json!(false)),
        ("keepAudioSession", json!(false)),
        ("useCamera2Api", json!(false)),
        ("playSoundOnCapture", json!(false)),
        ("playSoundOnRecord", json!(false)),
        ("pictureSize", json!("None")),
        ("videoStabilizationMode", json!(0)),
        ("mirrorVideo", json!(false)),
    ];
    for (key, value) in fixed {
        props.insert(key.to_string(), value);
    }

    let face = &constants.face_detection;
    let vision = &constants.google_vision_barcode_detection;
    let native = [
        ("type", constants.camera_type.get("back")),
        ("autoFocus", constants.auto_focus.get("on")),
        ("flashMode", constants.flash_mode.get("off")),
        ("whiteBalance", constants.white_balance.get("auto")),
        ("faceDetectionMode", face.mode.get("fast")),
        ("faceDetectionLandmarks", face.landmarks.get("none")),
        ("faceDetectionClassifications", face.classifications.get("none")),
        ("googleVisionBarcodeType", vision.barcode_type.get("None")),
        ("googleVisionBarcodeMode", vision.barcode_mode.get("NORMAL")),
    ];
    for (key, value) in native {
        if let Some(value) = value {
            props.insert(key.to_string(), value.clone());
        }
    }

    let barcode_types = constants.bar_code_type.values().cloned().collect();
    props.insert("barCodeTypes".to_string(), Value::Array(barcode_types));
    props
}

/// Turns application props into native props.
#[derive(Debug, Clone)]
pub struct PropTranslator {
    tables: ConversionTables,
    defaults: CameraProps,
    platform: Platform,
}

impl PropTranslator {
    pub fn new(constants: &NativeConstants, platform: Platform) -> Self {
        Self {
            tables: ConversionTables::from_constants(constants),
            defaults: default_props(constants),
            platform,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Application props layered over the defaults.
    pub fn resolve(&self, props: &CameraProps) -> CameraProps {
        let mut resolved = self.defaults.clone();
        resolved.extend(props.iter().map(|(key, value)| (key.clone(), value.clone())));
        resolved
    }

    pub fn translate(&self, props: &CameraProps, capabilities: &Capabilities) -> NativeProps {
        let mut native: NativeProps = self
            .resolve(props)
            .iter()
            .map(|(key, value)| (key.clone(), self.tables.convert(key, value)))
            .collect();

        for capability in capabilities.iter() {
            native.insert(capability.prop_name().to_string(), Value::Bool(true));
        }

        if self.platform == Platform::Ios {
            native.remove(IOS_DROPPED_PROP);
        }

        log::debug!(
            "translated {} camera props ({} capabilities)",
            native.len(),
            capabilities.0.len()
        );
        native
    }
}

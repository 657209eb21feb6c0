use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Friendly name -> native code, as reported by the native peer.
pub type ConstantTable = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FaceDetectionConstants {
    pub mode: ConstantTable,
    pub landmarks: ConstantTable,
    pub classifications: ConstantTable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VisionBarcodeConstants {
    pub barcode_type: ConstantTable,
    pub barcode_mode: ConstantTable,
}

/// Enumerations exported by the native camera module. Fetched once when the
/// plugin is set up and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NativeConstants {
    #[serde(rename = "Type")]
    pub camera_type: ConstantTable,
    pub flash_mode: ConstantTable,
    pub exposure: ConstantTable,
    pub auto_focus: ConstantTable,
    pub white_balance: ConstantTable,
    pub video_quality: ConstantTable,
    pub video_codec: ConstantTable,
    pub image_type: ConstantTable,
    pub bar_code_type: ConstantTable,
    pub face_detection: FaceDetectionConstants,
    pub google_vision_barcode_detection: VisionBarcodeConstants,
    pub video_stabilization: ConstantTable,
    pub orientation: ConstantTable,
    pub capture_target: ConstantTable,
}

fn table(entries: &[(&str, Value)]) -> ConstantTable {
    entries
        .iter()
        .map(|(name, code)| (name.to_string(), code.clone()))
        .collect()
}

impl NativeConstants {
    /// The values the Android camera module reports. Used by peers that
    /// cannot ask a native module for them.
    pub fn builtin() -> Self {
        Self {
            camera_type: table(&[("front", json!(1)), ("back", json!(0))]),
            flash_mode: table(&[
                ("off", json!(0)),
                ("on", json!(1)),
                ("auto", json!(3)),
                ("torch", json!(2)),
            ]),
            exposure: ConstantTable::new(),
            auto_focus: table(&[("on", json!(true)), ("off", json!(false))]),
            white_balance: table(&[
                ("auto", json!(0)),
                ("cloudy", json!(1)),
                ("sunny", json!(2)),
                ("shadow", json!(3)),
                ("fluorescent", json!(4)),
                ("incandescent", json!(5)),
            ]),
            video_quality: table(&[
                ("2160p", json!(0)),
                ("1080p", json!(1)),
                ("720p", json!(2)),
                ("480p", json!(3)),
                ("4:3", json!(4)),
            ]),
            video_codec: ConstantTable::new(),
            image_type: ConstantTable::new(),
            bar_code_type: table(&[
                ("aztec", json!("AZTEC")),
                ("ean13", json!("EAN_13")),
                ("ean8", json!("EAN_8")),
                ("qr", json!("QR_CODE")),
                ("pdf417", json!("PDF_417")),
                ("upc_e", json!("UPC_E")),
                ("datamatrix", json!("DATA_MATRIX")),
                ("code39", json!("CODE_39")),
                ("code93", json!("CODE_93")),
                ("interleaved2of5", json!("ITF")),
                ("codabar", json!("CODABAR")),
                ("code128", json!("CODE_128")),
                ("maxicode", json!("MAXICODE")),
                ("rss14", json!("RSS_14")),
                ("rssexpanded", json!("RSS_EXPANDED")),
                ("upc_a", json!("UPC_A")),
                ("upc_ean", json!("UPC_EAN_EXTENSION")),
            ]),
            face_detection: FaceDetectionConstants {
                mode: table(&[("fast", json!(0)), ("accurate", json!(1))]),
                landmarks: table(&[("all", json!(1)), ("none", json!(0))]),
                classifications: table(&[("all", json!(1)), ("none", json!(0))]),
            },
            google_vision_barcode_detection: VisionBarcodeConstants {
                barcode_type: table(&[
                    ("None", json!(0)),
                    ("CODE_128", json!(1)),
                    ("CODE_39", json!(2)),
                    ("CODE_93", json!(4)),
                    ("CODABAR", json!(8)),
                    ("DATA_MATRIX", json!(16)),
                    ("EAN_13", json!(32)),
                    ("EAN_8", json!(64)),
                    ("ITF", json!(128)),
                    ("QR_CODE", json!(256)),
                    ("UPC_A", json!(512)),
                    ("UPC_E", json!(1024)),
                    ("PDF417", json!(2048)),
                    ("AZTEC", json!(4096)),
                    ("ALL", json!(65535)),
                ]),
                barcode_mode: table(&[
                    ("NORMAL", json!(0)),
                    ("ALTERNATE", json!(1)),
                    ("INVERTED", json!(2)),
                ]),
            },
            video_stabilization: ConstantTable::new(),
            orientation: table(&[
                ("auto", json!(0)),
                ("portrait", json!(1)),
                ("portraitUpsideDown", json!(2)),
                ("landscapeLeft", json!(3)),
                ("landscapeRight", json!(4)),
            ]),
            capture_target: ConstantTable::new(),
        }
    }
}

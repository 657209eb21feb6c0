//! Forwarding of capture, recording and query calls to the native peer.

use std::time::Duration;

use serde_json::Value;

use crate::config::Config;
use crate::constants::NativeConstants;
use crate::error::{Error, Result};
use crate::models::{
    NativePictureOptions, NativeRecordingOptions, Orientation, PictureOptions, RecordingOptions,
};
use crate::peer::{CameraHandle, ControlAction, NativePeer};
use crate::platform::Platform;
use crate::props::{CameraProps, Capabilities, NativeProps, PropTranslator};

/// The peer together with everything derived from its constants. Built once
/// when the plugin is set up and shared by every view.
#[derive(Debug)]
pub struct CameraBridge<P> {
    peer: P,
    constants: NativeConstants,
    translator: PropTranslator,
    throttle_window: Duration,
}

fn require<'a>(
    handle: Option<&'a CameraHandle>,
    operation: &'static str,
) -> Result<&'a CameraHandle> {
    handle.ok_or(Error::MissingHandle { operation })
}

impl<P: NativePeer> CameraBridge<P> {
    pub fn new(peer: P, constants: NativeConstants, config: &Config) -> Self {
        let platform = config.platform();
        log::debug!("Camera bridge running on {}", platform);
        Self {
            translator: PropTranslator::new(&constants, platform),
            peer,
            constants,
            throttle_window: config.throttle_window(),
        }
    }

    pub fn peer(&self) -> &P {
        &self.peer
    }

    pub fn constants(&self) -> &NativeConstants {
        &self.constants
    }

    pub fn platform(&self) -> Platform {
        self.translator.platform()
    }

    pub fn throttle_window(&self) -> Duration {
        self.throttle_window
    }

    pub fn resolve_props(&self, props: &CameraProps) -> CameraProps {
        self.translator.resolve(props)
    }

    pub fn translate(&self, props: &CameraProps, capabilities: &Capabilities) -> NativeProps {
        self.translator.translate(props, capabilities)
    }

    fn orientation_code(&self, orientation: Orientation) -> Value {
        self.constants
            .orientation
            .get(orientation.as_str())
            .cloned()
            .unwrap_or_else(|| Value::String(orientation.as_str().to_string()))
    }

    pub fn picture_options(&self, options: PictureOptions) -> NativePictureOptions {
        let quality = match options.quality {
            Some(quality) if quality != 0.0 && !quality.is_nan() => quality,
            _ => 1.0,
        };
        NativePictureOptions {
            quality,
            orientation: options.orientation.map(|o| self.orientation_code(o)),
            base64: options.base64,
            mirror_image: options.mirror_image,
            exif: options.exif,
            write_exif: options.write_exif,
            width: options.width,
            fix_orientation: options.fix_orientation,
            force_up_orientation: options.force_up_orientation,
            pause_after_capture: options.pause_after_capture.unwrap_or(false),
        }
    }

    pub fn recording_options(&self, options: RecordingOptions) -> NativeRecordingOptions {
        let quality = options.quality.map(|quality| {
            let code = quality
                .as_str()
                .and_then(|name| self.constants.video_quality.get(name))
                .cloned();
            code.unwrap_or(quality)
        });
        NativeRecordingOptions {
            max_duration: options.max_duration,
            max_file_size: options.max_file_size,
            orientation: options.orientation.map(|o| self.orientation_code(o)),
            quality,
            fps: options.fps,
            codec: options.codec,
            mute: options.mute,
            path: options.path,
        }
    }

    pub async fn take_picture(
        &self,
        handle: Option<&CameraHandle>,
        options: Option<PictureOptions>,
    ) -> Result<Value> {
        let handle = require(handle, "takePicture")?;
        let options = self.picture_options(options.unwrap_or_default());
        self.peer.take_picture(handle, &options).await
    }

    pub async fn record(
        &self,
        handle: Option<&CameraHandle>,
        options: Option<RecordingOptions>,
    ) -> Result<Value> {
        let handle = require(handle, "record")?;
        let options = self.recording_options(options.unwrap_or_default());
        self.peer.record(handle, &options).await
    }

    pub async fn control(&self, handle: Option<&CameraHandle>, action: ControlAction) -> Result<()> {
        let handle = require(handle, action.method_name())?;
        self.peer.control(handle, action).await
    }

    pub async fn get_supported_ratios(&self, handle: Option<&CameraHandle>) -> Result<Vec<String>> {
        const OPERATION: &str = "getSupportedRatios";
        match self.platform() {
            Platform::Android => {
                let handle = require(handle, OPERATION)?;
                self.peer.get_supported_ratios(handle).await
            }
            platform => Err(Error::Unsupported {
                operation: OPERATION,
                platform,
            }),
        }
    }

    /// Android needs a live camera to list ids; the other peers do not.
    pub async fn get_camera_ids(&self, handle: Option<&CameraHandle>) -> Result<Vec<Value>> {
        match self.platform() {
            Platform::Android => {
                let handle = require(handle, "getCameraIds")?;
                self.peer.get_camera_ids(Some(handle)).await
            }
            Platform::Ios | Platform::Desktop => self.peer.get_camera_ids(None).await,
        }
    }

    pub async fn get_supported_preview_fps_range(
        &self,
        handle: Option<&CameraHandle>,
    ) -> Result<Vec<Value>> {
        const OPERATION: &str = "getSupportedPreviewFpsRange";
        match self.platform() {
            Platform::Android => {
                let handle = require(handle, OPERATION)?;
                self.peer.get_supported_preview_fps_range(handle).await
            }
            platform => Err(Error::Unsupported {
                operation: OPERATION,
                platform,
            }),
        }
    }

    pub async fn get_available_picture_sizes(
        &self,
        handle: Option<&CameraHandle>,
        ratio: Option<&str>,
    ) -> Result<Vec<String>> {
        let handle = require(handle, "getAvailablePictureSizes")?;
        self.peer.get_available_picture_sizes(ratio, handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockPeer};
    use serde_json::json;

    fn bridge(platform: Platform) -> CameraBridge<MockPeer> {
        let config = Config {
            platform: Some(platform),
            ..Config::default()
        };
        CameraBridge::new(MockPeer::default(), NativeConstants::builtin(), &config)
    }

    #[tokio::test]
    async fn test_take_picture_without_handle_fails_fast() {
        let bridge = bridge(Platform::Android);
        let err = bridge.take_picture(None, None).await.unwrap_err();
        assert!(matches!(err, Error::MissingHandle { operation: "takePicture" }));
        assert!(bridge.peer().calls().is_empty());
    }

    #[tokio::test]
    async fn test_take_picture_normalizes_options() {
        let bridge = bridge(Platform::Android);
        let handle = CameraHandle::new("cam");
        let options = PictureOptions {
            quality: Some(0.0),
            orientation: Some(Orientation::LandscapeLeft),
            base64: Some(true),
            ..PictureOptions::default()
        };

        bridge.take_picture(Some(&handle), Some(options)).await.unwrap();

        let expected = NativePictureOptions {
            quality: 1.0,
            orientation: Some(json!(3)),
            base64: Some(true),
            mirror_image: None,
            exif: None,
            write_exif: None,
            width: None,
            fix_orientation: None,
            force_up_orientation: None,
            pause_after_capture: false,
        };
        assert_eq!(bridge.peer().calls(), vec![Call::TakePicture(handle, expected)]);
    }

    #[test]
    fn test_picture_quality_is_kept_when_set() {
        let bridge = bridge(Platform::Android);
        let options = bridge.picture_options(PictureOptions {
            quality: Some(0.5),
            pause_after_capture: Some(true),
            ..PictureOptions::default()
        });
        assert_eq!(options.quality, 0.5);
        assert!(options.pause_after_capture);
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "quality": 0.5, "pauseAfterCapture": true })
        );
    }

    #[test]
    fn test_recording_quality_names_are_mapped() {
        let bridge = bridge(Platform::Android);
        let named = bridge.recording_options(RecordingOptions {
            quality: Some(json!("720p")),
            orientation: Some(Orientation::Portrait),
            codec: Some("H264".into()),
            ..RecordingOptions::default()
        });
        assert_eq!(named.quality, Some(json!(2)));
        assert_eq!(named.orientation, Some(json!(1)));
        assert_eq!(named.codec.as_deref(), Some("H264"));

        let numeric = bridge.recording_options(RecordingOptions {
            quality: Some(json!(1)),
            ..RecordingOptions::default()
        });
        assert_eq!(numeric.quality, Some(json!(1)));

        let unknown = bridge.recording_options(RecordingOptions {
            quality: Some(json!("8k")),
            ..RecordingOptions::default()
        });
        assert_eq!(unknown.quality, Some(json!("8k")));
    }

    #[tokio::test]
    async fn test_ratios_unsupported_off_android() {
        for platform in [Platform::Ios, Platform::Desktop] {
            let bridge = bridge(platform);
            let handle = CameraHandle::new("cam");
            let err = bridge.get_supported_ratios(Some(&handle)).await.unwrap_err();
            assert!(matches!(err, Error::Unsupported { operation: "getSupportedRatios", .. }));
            assert_eq!(
                err.to_string(),
                format!("getSupportedRatios is not supported on {}", platform)
            );
            assert!(bridge.peer().calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_ratios_on_android_need_handle() {
        let bridge = bridge(Platform::Android);
        assert!(matches!(
            bridge.get_supported_ratios(None).await,
            Err(Error::MissingHandle { .. })
        ));

        let handle = CameraHandle::new("cam");
        let ratios = bridge.get_supported_ratios(Some(&handle)).await.unwrap();
        assert_eq!(ratios, vec!["4:3".to_string(), "16:9".to_string()]);
    }

    #[tokio::test]
    async fn test_camera_ids_per_platform() {
        let android = bridge(Platform::Android);
        assert!(matches!(
            android.get_camera_ids(None).await,
            Err(Error::MissingHandle { .. })
        ));

        let ios = bridge(Platform::Ios);
        ios.get_camera_ids(None).await.unwrap();
        assert_eq!(ios.peer().calls(), vec![Call::CameraIds(None)]);
    }

    #[tokio::test]
    async fn test_preview_fps_range_unsupported_on_ios() {
        let bridge = bridge(Platform::Ios);
        let handle = CameraHandle::new("cam");
        assert!(matches!(
            bridge.get_supported_preview_fps_range(Some(&handle)).await,
            Err(Error::Unsupported { .. })
        ));
        assert!(bridge.peer().calls().is_empty());
    }

    #[tokio::test]
    async fn test_controls_forward_with_handle() {
        let bridge = bridge(Platform::Ios);
        let handle = CameraHandle::new("cam");
        bridge
            .control(Some(&handle), ControlAction::PausePreview)
            .await
            .unwrap();
        let err = bridge.control(None, ControlAction::StopRecording).await.unwrap_err();
        assert!(matches!(err, Error::MissingHandle { operation: "stopRecording" }));
        assert_eq!(
            bridge.peer().calls(),
            vec![Call::Control(handle, ControlAction::PausePreview)]
        );
    }

    #[tokio::test]
    async fn test_picture_sizes_forward_ratio() {
        let bridge = bridge(Platform::Android);
        let handle = CameraHandle::new("cam");
        bridge
            .get_available_picture_sizes(Some(&handle), Some("16:9"))
            .await
            .unwrap();
        assert_eq!(
            bridge.peer().calls(),
            vec![Call::PictureSizes(Some("16:9".to_string()), handle)]
        );
    }
}

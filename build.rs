const COMMANDS: &[&str] = &[
    "get_constants",
    "mount_camera",
    "update_camera",
    "unmount_camera",
    "get_camera_status",
    "take_picture",
    "record",
    "stop_recording",
    "pause_recording",
    "resume_recording",
    "pause_preview",
    "resume_preview",
    "get_supported_ratios",
    "get_camera_ids",
    "get_supported_preview_fps_range",
    "get_available_picture_sizes",
];

fn main() {
    tauri_plugin::Builder::new(COMMANDS)
        .android_path("android")
        .ios_path("ios")
        .build();
}

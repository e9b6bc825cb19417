use std::path::PathBuf;

/// Tool configuration, loaded from environment variables.
pub struct Config {
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// Directory of reference images, one per enrolled identity.
    pub faces_dir: PathBuf,
    /// Attendance CSV path.
    pub ledger_path: PathBuf,
    /// Path to the ONNX embedding model.
    pub model_path: String,
    /// Cosine similarity threshold for a positive match.
    pub match_threshold: f32,
}

impl Config {
    /// Load configuration from `MUSTER_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("MUSTER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            camera_device: std::env::var("MUSTER_CAMERA_DEVICE")
                .unwrap_or_else(|_| "/dev/video0".to_string()),
            faces_dir: data_dir.join("faces"),
            ledger_path: data_dir.join("attendance.csv"),
            model_path: std::env::var("MUSTER_MODEL_PATH").unwrap_or_else(|_| {
                data_dir
                    .join("models/w600k_r50.onnx")
                    .to_string_lossy()
                    .into_owned()
            }),
            match_threshold: env_f32(
                "MUSTER_MATCH_THRESHOLD",
                muster_verify::DEFAULT_MATCH_THRESHOLD,
            ),
        }
    }
}

fn default_data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local/share")
        })
        .join("muster")
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

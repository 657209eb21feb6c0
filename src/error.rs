use serde::{ser::Serializer, Serialize};

use crate::platform::Platform;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[cfg(mobile)]
  #[error(transparent)]
  PluginInvoke(#[from] tauri::plugin::mobile::PluginInvokeError),
  #[error("Camera handle cannot be null (while calling {operation})")]
  MissingHandle { operation: &'static str },
  #[error("{operation} is not supported on {platform}")]
  Unsupported {
    operation: &'static str,
    platform: Platform,
  },
  #[error("Camera view not found: {0}")]
  ViewNotFound(String),
  #[error("Native camera error: {0}")]
  Native(String),
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(self.to_string().as_ref())
  }
}

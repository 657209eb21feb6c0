use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::props::CameraProps;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationStatus {
    PendingAuthorization,
    NotAuthorized,
    Ready,
}

impl AuthorizationStatus {
    pub const ALL: [AuthorizationStatus; 3] = [
        AuthorizationStatus::Ready,
        AuthorizationStatus::PendingAuthorization,
        AuthorizationStatus::NotAuthorized,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AuthorizationStatus::PendingAuthorization => "PENDING_AUTHORIZATION",
            AuthorizationStatus::NotAuthorized => "NOT_AUTHORIZED",
            AuthorizationStatus::Ready => "READY",
        }
    }
}

/// Arguments of the single permission prompt issued when a view mounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequest {
    pub needs_audio: bool,
    pub dialog_title: String,
    pub dialog_message: String,
}

impl PermissionRequest {
    pub fn from_props(props: &CameraProps) -> Self {
        let text = |key: &str| {
            props
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            needs_audio: props
                .get("captureAudio")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            dialog_title: text("permissionDialogTitle"),
            dialog_message: text("permissionDialogMessage"),
        }
    }
}

/// Whoever can prompt the user for camera (and microphone) access.
pub trait PermissionCollaborator: Send + Sync {
    fn request_permissions(
        &self,
        request: &PermissionRequest,
    ) -> impl Future<Output = Result<bool>> + Send;
}

/// Cleared when the owning view unmounts.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Three-state authorization gate. Leaves `PendingAuthorization` exactly
/// once and never goes back.
#[derive(Debug)]
pub struct PermissionGate {
    status: AuthorizationStatus,
    mounted: Arc<AtomicBool>,
    requested: bool,
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionGate {
    pub fn new() -> Self {
        Self {
            status: AuthorizationStatus::PendingAuthorization,
            mounted: Arc::new(AtomicBool::new(true)),
            requested: false,
        }
    }

    pub fn status(&self) -> AuthorizationStatus {
        self.status
    }

    /// Hands out the liveness flag for the one permission request a view may
    /// issue. Returns `None` on every later call.
    pub fn begin(&mut self) -> Option<Liveness> {
        if self.requested {
            return None;
        }
        self.requested = true;
        Some(Liveness(self.mounted.clone()))
    }

    /// Applies the collaborator's answer. Ignored once the view is gone or
    /// the status already settled.
    pub fn resolve(&mut self, granted: bool) -> Option<AuthorizationStatus> {
        if !self.mounted.load(Ordering::Acquire)
            || self.status != AuthorizationStatus::PendingAuthorization
        {
            return None;
        }
        self.status = if granted {
            AuthorizationStatus::Ready
        } else {
            AuthorizationStatus::NotAuthorized
        };
        Some(self.status)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

/// Asks the collaborator and returns its answer, or `None` if the view
/// unmounted while the prompt was up. A failing collaborator counts as a
/// denial.
pub async fn authorize<C>(
    collaborator: &C,
    request: &PermissionRequest,
    liveness: &Liveness,
) -> Option<bool>
where
    C: PermissionCollaborator,
{
    let granted = match collaborator.request_permissions(request).await {
        Ok(granted) => granted,
        Err(e) => {
            log::warn!("Permission request failed, treating as denied: {}", e);
            false
        }
    };

    if !liveness.is_alive() {
        log::info!("Camera view unmounted before permission resolved, discarding result");
        return None;
    }
    Some(granted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPermissions;
    use serde_json::json;

    #[test]
    fn test_gate_starts_pending_and_settles_once() {
        let mut gate = PermissionGate::new();
        assert_eq!(gate.status(), AuthorizationStatus::PendingAuthorization);

        assert_eq!(gate.resolve(false), Some(AuthorizationStatus::NotAuthorized));
        assert_eq!(gate.resolve(true), None);
        assert_eq!(gate.status(), AuthorizationStatus::NotAuthorized);
    }

    #[test]
    fn test_gate_hands_out_one_request() {
        let mut gate = PermissionGate::new();
        assert!(gate.begin().is_some());
        assert!(gate.begin().is_none());
    }

    #[test]
    fn test_unmounted_gate_ignores_resolution() {
        let mut gate = PermissionGate::new();
        let liveness = gate.begin().unwrap();
        gate.unmount();
        assert!(!liveness.is_alive());
        assert_eq!(gate.resolve(true), None);
        assert_eq!(gate.status(), AuthorizationStatus::PendingAuthorization);
    }

    #[test]
    fn test_request_from_props() {
        let props = json!({
            "captureAudio": true,
            "permissionDialogTitle": "Camera",
            "permissionDialogMessage": "We need your camera"
        });
        let request = PermissionRequest::from_props(props.as_object().unwrap());
        assert!(request.needs_audio);
        assert_eq!(request.dialog_title, "Camera");
        assert_eq!(request.dialog_message, "We need your camera");

        let empty = PermissionRequest::from_props(&CameraProps::new());
        assert_eq!(empty, PermissionRequest::default());
    }

    #[tokio::test]
    async fn test_authorize_reports_answer() {
        let mut gate = PermissionGate::new();
        let liveness = gate.begin().unwrap();
        let permissions = ScriptedPermissions::answering(true);

        let answer = authorize(&permissions, &PermissionRequest::default(), &liveness).await;
        assert_eq!(answer, Some(true));
        assert_eq!(permissions.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_authorize_discards_after_unmount() {
        let mut gate = PermissionGate::new();
        let liveness = gate.begin().unwrap();
        let (permissions, answer) = ScriptedPermissions::deferred();

        let pending = tokio::spawn(async move {
            authorize(&permissions, &PermissionRequest::default(), &liveness).await
        });
        gate.unmount();
        answer.send(true).unwrap();

        assert_eq!(pending.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_request_counts_as_denied() {
        let mut gate = PermissionGate::new();
        let liveness = gate.begin().unwrap();
        let permissions = ScriptedPermissions::failing();

        let answer = authorize(&permissions, &PermissionRequest::default(), &liveness).await;
        assert_eq!(answer, Some(false));
    }
}

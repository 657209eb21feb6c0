use std::fmt;

use serde::{Deserialize, Serialize};

use crate::peer::CameraHandle;
use crate::permission::AuthorizationStatus;
use crate::props::NativeProps;

type ViewBuilder<V> = Box<dyn Fn(Option<&CameraHandle>, AuthorizationStatus) -> V + Send + Sync>;

/// How the caller wants the view drawn around the authorization gate.
pub enum RenderMode<V> {
    /// Static placeholders while pending or denied, static children otherwise.
    Fixed {
        pending: V,
        not_authorized: V,
        children: Option<V>,
    },
    /// The live camera is always drawn and the builder decides what to show
    /// inside it for the current status.
    Builder(ViewBuilder<V>),
}

impl<V> RenderMode<V> {
    pub fn builder<F>(build: F) -> Self
    where
        F: Fn(Option<&CameraHandle>, AuthorizationStatus) -> V + Send + Sync + 'static,
    {
        RenderMode::Builder(Box::new(build))
    }

    pub fn is_builder(&self) -> bool {
        matches!(self, RenderMode::Builder(_))
    }

    /// Whether the live camera view is drawn for `status`.
    pub fn shows_camera(&self, status: AuthorizationStatus) -> bool {
        self.is_builder() || status == AuthorizationStatus::Ready
    }
}

impl<V: Clone> RenderMode<V> {
    pub fn render<F>(
        &self,
        status: AuthorizationStatus,
        handle: Option<&CameraHandle>,
        props: F,
    ) -> Rendered<V>
    where
        F: FnOnce() -> NativeProps,
    {
        match self {
            RenderMode::Builder(build) => Rendered::Camera {
                props: props(),
                children: Some(build(handle, status)),
            },
            RenderMode::Fixed {
                pending,
                not_authorized,
                children,
            } => match status {
                AuthorizationStatus::Ready => Rendered::Camera {
                    props: props(),
                    children: children.clone(),
                },
                AuthorizationStatus::PendingAuthorization => Rendered::Placeholder {
                    view: pending.clone(),
                },
                AuthorizationStatus::NotAuthorized => Rendered::Placeholder {
                    view: not_authorized.clone(),
                },
            },
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for RenderMode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Fixed {
                pending,
                not_authorized,
                children,
            } => f
                .debug_struct("Fixed")
                .field("pending", pending)
                .field("not_authorized", not_authorized)
                .field("children", children)
                .finish(),
            RenderMode::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rendered<V> {
    Placeholder { view: V },
    Camera { props: NativeProps, children: Option<V> },
}

impl<V> Rendered<V> {
    pub fn is_camera(&self) -> bool {
        matches!(self, Rendered::Camera { .. })
    }
}

/// What the webview should draw in a slot of the camera view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "slot", rename_all = "camelCase")]
pub enum Slot {
    PendingAuthorization,
    NotAuthorized,
    Children,
    Status { status: AuthorizationStatus },
}

/// Render mode requested over IPC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderKind {
    #[default]
    Fixed,
    FunctionAsChild,
}

impl RenderKind {
    pub fn into_mode(self) -> RenderMode<Slot> {
        match self {
            RenderKind::Fixed => RenderMode::Fixed {
                pending: Slot::PendingAuthorization,
                not_authorized: Slot::NotAuthorized,
                children: Some(Slot::Children),
            },
            RenderKind::FunctionAsChild => {
                RenderMode::builder(|_, status| Slot::Status { status })
            }
        }
    }
}

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::permission::PermissionKind;
use super::state::{OverlayState, OverlaySurface};
use super::ui::UiThread;
use crate::config::OverlayLayout;
use crate::error::AgentError;
use crate::platform::{CapabilityAuthority, Notifier, OverlayWindow, WindowSystem};

const NOT_GRANTED_NOTICE: &str = "Overlay permission not granted";
const SHOWN_NOTICE: &str = "Overlay Shown";
const HIDDEN_NOTICE: &str = "Overlay Hidden";

/// Owns the single overlay window and toggles it on the UI thread.
pub struct OverlayController {
    inner: Arc<Inner>,
    ui: UiThread,
}

struct Inner {
    capabilities: Arc<dyn CapabilityAuthority>,
    windows: Arc<dyn WindowSystem>,
    notifier: Arc<dyn Notifier>,
    layout: OverlayLayout,
    state: Mutex<OverlayState>,
}

impl OverlayController {
    pub fn new(
        capabilities: Arc<dyn CapabilityAuthority>,
        windows: Arc<dyn WindowSystem>,
        notifier: Arc<dyn Notifier>,
        layout: OverlayLayout,
        ui: UiThread,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                capabilities,
                windows,
                notifier,
                layout,
                state: Mutex::new(OverlayState::default()),
            }),
            ui,
        }
    }

    /// Shows the overlay if hidden, hides it if shown.
    ///
    /// The capability is checked here, synchronously; the window work is
    /// queued on the UI thread and not awaited.
    pub fn toggle(&self) {
        if !self.inner.capabilities.has_capability(PermissionKind::OverlayDraw) {
            warn!("Overlay toggle refused: permission not granted");
            self.inner.notifier.notify(NOT_GRANTED_NOTICE);
            return;
        }

        let inner = self.inner.clone();
        self.ui.run(move || inner.apply_toggle());
    }

    pub fn is_visible(&self) -> bool {
        self.inner.state().visible
    }

    /// The window, once built.
    pub fn window(&self) -> Option<OverlayWindow> {
        self.inner.state().surface.as_ref().map(|s| s.window.clone())
    }

    pub fn ui(&self) -> &UiThread {
        &self.ui
    }
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn apply_toggle(&self) {
        let (surface, visible) = {
            let mut state = self.state();
            let surface = state
                .surface
                .get_or_insert_with(|| {
                    let (window, params) = OverlayWindow::build(&self.layout);
                    debug!("Built overlay window {}", window.id);
                    Arc::new(OverlaySurface { window, params })
                })
                .clone();
            (surface, state.visible)
        };

        if visible {
            self.hide(&surface);
        } else {
            self.show(&surface);
        }
    }

    fn show(&self, surface: &OverlaySurface) {
        // Left on the display by an earlier failed detach.
        let attached = if self.windows.is_attached(&surface.window) {
            debug!("Overlay already attached, skipping attach");
            Ok(())
        } else {
            self.windows.attach(&surface.window, &surface.params)
        };

        match attached {
            Ok(()) => {
                self.state().visible = true;
                info!("Overlay shown");
                self.notifier.notify(SHOWN_NOTICE);
            }
            Err(reason) => {
                let err = AgentError::WindowAttachFailed(reason);
                warn!("{}", err);
                self.notifier.notify(&err.to_string());
            }
        }
    }

    fn hide(&self, surface: &OverlaySurface) {
        // The system may have removed the window behind our back.
        let detached = if self.windows.is_attached(&surface.window) {
            self.windows
                .detach(&surface.window)
                .map_err(AgentError::WindowDetachFailed)
        } else {
            debug!("Overlay already detached, skipping detach");
            Ok(())
        };

        // Hidden regardless of the detach outcome.
        self.state().visible = false;

        match detached {
            Ok(()) => {
                info!("Overlay hidden");
                self.notifier.notify(HIDDEN_NOTICE);
            }
            Err(err) => {
                warn!("{}", err);
                self.notifier.notify(&err.to_string());
            }
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::OverlayLayout;

/// Content of the overlay window. Built once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayWindow {
    pub id: Uuid,
    pub label: String,
    pub background_argb: u32,
    pub text_argb: u32,
    pub padding: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gravity {
    TopStart,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub x: i32,
    pub y: i32,
    /// `None` means wrap content.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub gravity: Gravity,
    pub focusable: bool,
    pub touch_modal: bool,
    pub translucent: bool,
}

impl OverlayWindow {
    pub fn build(layout: &OverlayLayout) -> (Self, LayoutParams) {
        let window = Self {
            id: Uuid::new_v4(),
            label: layout.label.clone(),
            background_argb: layout.background_argb,
            text_argb: layout.text_argb,
            padding: layout.padding,
        };
        let params = LayoutParams {
            x: layout.x,
            y: layout.y,
            width: layout.width,
            height: layout.height,
            gravity: Gravity::TopStart,
            focusable: layout.focusable,
            touch_modal: layout.touch_modal,
            translucent: layout.translucent,
        };
        (window, params)
    }
}

/// Windowing system. Every call must happen on the UI-affinity thread.
pub trait WindowSystem: Send + Sync {
    fn attach(&self, window: &OverlayWindow, params: &LayoutParams) -> Result<(), String>;
    fn detach(&self, window: &OverlayWindow) -> Result<(), String>;
    fn is_attached(&self, window: &OverlayWindow) -> bool;
}

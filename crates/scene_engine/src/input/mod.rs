//! Input management system
//!
//! [`InputState`] is fed with [`AppEvent`]s and answers the questions the
//! editor asks once per tick: which keys are held, was there a left click,
//! and how far has the mouse moved while looking around.

pub mod picking;

pub use picking::MouseState;

use crate::application::AppEvent;
use std::collections::HashSet;

/// Key codes the editor binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key (forward)
    W,
    /// A key (left)
    A,
    /// S key (back)
    S,
    /// D key (right)
    D,
    /// Space (up)
    Space,
    /// Left shift (down)
    LeftShift,
    /// Left control (speed boost)
    LeftControl,
    /// Escape (clear selection)
    Escape,
    /// F1 (widen field of view)
    F1,
    /// F2 (narrow field of view)
    F2,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

bitflags::bitflags! {
    /// Held modifier keys
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Either control key
        const CONTROL = 1 << 0;
        /// Either shift key
        const SHIFT = 1 << 1;
        /// Either alt key
        const ALT = 1 << 2;
        /// Command / Windows key
        const SUPER = 1 << 3;
    }
}

/// Accumulated input for the current frame
#[derive(Debug, Clone)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    modifiers: Modifiers,
    mouse: MouseState,
    pending_click: Option<(f64, f64)>,
    look_active: bool,
    first_look_sample: bool,
    last_cursor: (f64, f64),
    look_delta: (f32, f32),
    gui_captures_mouse: bool,
    gui_captures_keyboard: bool,
    close_requested: bool,
}

impl InputState {
    /// Fresh state for a viewport of the given size
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            keys: HashSet::new(),
            buttons: HashSet::new(),
            modifiers: Modifiers::empty(),
            mouse: MouseState::new(viewport_width, viewport_height),
            pending_click: None,
            look_active: false,
            first_look_sample: true,
            last_cursor: (0.0, 0.0),
            look_delta: (0.0, 0.0),
            gui_captures_mouse: false,
            gui_captures_keyboard: false,
            close_requested: false,
        }
    }

    /// Fold one event into the state
    ///
    /// Returns `true` when the event was an input event; commands and mode
    /// requests are left to the caller.
    pub fn handle_event(&mut self, event: &AppEvent) -> bool {
        match *event {
            AppEvent::WindowResized { width, height } => self.mouse.update_window_size(width, height),
            AppEvent::WindowCloseRequested => self.close_requested = true,
            AppEvent::KeyPressed(key) => {
                self.keys.insert(key);
            }
            AppEvent::KeyReleased(key) => {
                self.keys.remove(&key);
            }
            AppEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers,
            AppEvent::MouseButton { button, pressed } => self.handle_button(button, pressed),
            AppEvent::MouseMoved { x, y } => self.handle_cursor(x, y),
            AppEvent::GuiCapture { mouse, keyboard } => {
                self.gui_captures_mouse = mouse;
                self.gui_captures_keyboard = keyboard;
            }
            AppEvent::Command(_) | AppEvent::RequestMode(_) => return false,
        }
        true
    }

    fn handle_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }

        if self.gui_captures_mouse {
            return;
        }

        match (button, pressed) {
            (MouseButton::Left, true) => {
                self.pending_click = Some((self.mouse.screen_x, self.mouse.screen_y));
            }
            (MouseButton::Right, true) => {
                self.look_active = true;
                self.first_look_sample = true;
            }
            (MouseButton::Right, false) => self.look_active = false,
            _ => {}
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn handle_cursor(&mut self, x: f64, y: f64) {
        self.mouse.update_position(x, y);
        if !self.look_active {
            return;
        }

        // The first sample after the button goes down only seeds the reference point.
        if self.first_look_sample {
            self.first_look_sample = false;
        } else {
            let (last_x, last_y) = self.last_cursor;
            self.look_delta.0 += (x - last_x) as f32;
            self.look_delta.1 += (last_y - y) as f32;
        }
        self.last_cursor = (x, y);
    }

    /// Whether a key is held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Whether a mouse button is held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Held modifier keys
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Cursor and viewport
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Consume the pending left click (cursor position at press time)
    pub fn take_left_click(&mut self) -> Option<(f64, f64)> {
        self.pending_click.take()
    }

    /// Whether right-button mouse-look is active
    pub fn is_looking(&self) -> bool {
        self.look_active
    }

    /// Consume the accumulated look offset in pixels (x right, y up)
    pub fn take_look_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    /// Whether the GUI overlay wants the mouse
    pub fn gui_captures_mouse(&self) -> bool {
        self.gui_captures_mouse
    }

    /// Whether the GUI overlay wants the keyboard
    pub fn gui_captures_keyboard(&self) -> bool {
        self.gui_captures_keyboard
    }

    /// Whether the window asked to close
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

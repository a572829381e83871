//! Browser bindings
//!
//! The page owns rendering and the `requestAnimationFrame` loop: it calls
//! [`WebGame::frame`] each tick and draws from [`WebGame::snapshot_json`].
//! Keyboard and focus handling are installed from Rust by [`WebGame::attach`].

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::shell::GameShell;

fn init_logging() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed by an earlier handle
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    shell: Rc<RefCell<GameShell>>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsValue> {
        init_logging();
        let shell = GameShell::with_bundled(Settings::load()).map_err(to_js)?;
        log::info!("Platform Quest ready ({} levels)", shell.level_count());
        Ok(Self {
            shell: Rc::new(RefCell::new(shell)),
        })
    }

    /// Install keydown/keyup listeners and auto-pause on focus loss
    pub fn attach(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| to_js("no window"))?;
        let document = window.document().ok_or_else(|| to_js("no document"))?;

        // Keyboard
        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let shell = self.shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let Ok(mut shell) = shell.try_borrow_mut() else {
                    return;
                };
                let key = event.key();
                let handled = if pressed {
                    // Auto-repeat would re-toggle pause
                    if event.repeat() && key == "Escape" {
                        return;
                    }
                    shell.key_down(&key)
                } else {
                    shell.key_up(&key)
                };
                if handled {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let shell = self.shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Ok(mut shell) = shell.try_borrow_mut() {
                    if shell.settings().pause_on_blur {
                        shell.pause();
                        log::info!("Auto-paused (window blur)");
                    }
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Visibility change (tab switch, minimize)
        {
            let shell = self.shell.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() != web_sys::VisibilityState::Hidden {
                    return;
                }
                if let Ok(mut shell) = shell.try_borrow_mut() {
                    if shell.settings().pause_on_blur {
                        shell.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        Ok(())
    }

    /// One animation frame; `now_ms` is the rAF timestamp
    pub fn frame(&self, now_ms: f64) {
        if let Ok(mut shell) = self.shell.try_borrow_mut() {
            shell.frame(now_ms);
        }
    }

    pub fn start(&self) -> Result<(), JsValue> {
        self.shell.borrow_mut().start_game().map_err(to_js)
    }

    pub fn restart(&self) -> Result<(), JsValue> {
        self.shell.borrow_mut().restart().map_err(to_js)
    }

    pub fn next_level(&self) -> Result<(), JsValue> {
        self.shell.borrow_mut().next_level().map_err(to_js)
    }

    pub fn quit_to_menu(&self) {
        self.shell.borrow_mut().quit_to_menu();
    }

    pub fn toggle_pause(&self) {
        self.shell.borrow_mut().toggle_pause();
    }

    pub fn key_down(&self, key: &str) -> bool {
        self.shell.borrow_mut().key_down(key)
    }

    pub fn key_up(&self, key: &str) -> bool {
        self.shell.borrow_mut().key_up(key)
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.shell.borrow().phase())
    }

    pub fn score(&self) -> f64 {
        self.shell.borrow().score() as f64
    }

    pub fn lives(&self) -> u32 {
        self.shell.borrow().lives()
    }

    /// 1-based level number
    pub fn level(&self) -> u32 {
        self.shell.borrow().level_index() as u32 + 1
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.shell.borrow().snapshot_json().map_err(to_js)
    }

    /// Replace and persist settings from a JSON string
    pub fn apply_settings(&self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(to_js)?;
        settings.save();
        self.shell.borrow_mut().set_settings(settings);
        Ok(())
    }
}

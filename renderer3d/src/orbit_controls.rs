// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::OrbitCamera;
use glam::{vec2, Vec2};
use gloo_events::{EventListener, EventListenerOptions};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent};

/// Pixels per line for wheel events that scroll by lines (Firefox).
const LINE_HEIGHT: f32 = 16.0;

/// Mouse listeners on a canvas that drive a shared [`OrbitCamera`]: dragging with any button
/// rotates, the wheel zooms. Listeners are removed when dropped.
pub struct OrbitControls {
    listeners: Vec<EventListener>,
}

impl OrbitControls {
    /// Starts listening to `canvas`.
    pub fn new(canvas: &HtmlCanvasElement, camera: Rc<RefCell<OrbitCamera>>) -> Self {
        // Last mouse position while a button is held.
        let drag: Rc<Cell<Option<Vec2>>> = Default::default();

        let mouse_down = {
            let drag = Rc::clone(&drag);
            EventListener::new(canvas, "mousedown", move |event| {
                drag.set(Some(mouse_position(event.unchecked_ref())));
            })
        };

        let mouse_move = {
            let drag = Rc::clone(&drag);
            let camera = Rc::clone(&camera);
            EventListener::new(canvas, "mousemove", move |event| {
                if let Some(last) = drag.get() {
                    let position = mouse_position(event.unchecked_ref());
                    camera.borrow_mut().drag(position - last);
                    drag.set(Some(position));
                }
            })
        };

        let mouse_up = {
            let drag = Rc::clone(&drag);
            EventListener::new(canvas, "mouseup", move |_| drag.set(None))
        };

        let mouse_leave = {
            let drag = Rc::clone(&drag);
            EventListener::new(canvas, "mouseleave", move |_| drag.set(None))
        };

        // Prevent default so the page doesn't scroll while zooming.
        let wheel = EventListener::new_with_options(
            canvas,
            "wheel",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let event: &WheelEvent = event.unchecked_ref();
                event.prevent_default();
                let delta = wheel_pixels(event.delta_y() as f32, event.delta_mode());
                camera.borrow_mut().wheel(delta);
            },
        );

        Self {
            listeners: vec![mouse_down, mouse_move, mouse_up, mouse_leave, wheel],
        }
    }

    /// Keeps listening for the life of the page.
    pub fn forget(self) {
        self.listeners.into_iter().for_each(EventListener::forget);
    }
}

fn mouse_position(event: &MouseEvent) -> Vec2 {
    vec2(event.client_x() as f32, event.client_y() as f32)
}

/// Normalizes a wheel delta to pixels. `delta_mode` is `WheelEvent.deltaMode`.
fn wheel_pixels(delta: f32, delta_mode: u32) -> f32 {
    match delta_mode {
        WheelEvent::DOM_DELTA_LINE => delta * LINE_HEIGHT,
        WheelEvent::DOM_DELTA_PAGE => delta * LINE_HEIGHT * 20.0,
        _ => delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_modes() {
        assert_eq!(wheel_pixels(3.0, WheelEvent::DOM_DELTA_PIXEL), 3.0);
        assert_eq!(wheel_pixels(3.0, WheelEvent::DOM_DELTA_LINE), 48.0);
        assert_eq!(wheel_pixels(1.0, WheelEvent::DOM_DELTA_PAGE), 320.0);
    }
}

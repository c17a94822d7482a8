// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::renderer::Renderer;
use gloo_render::{request_animation_frame, AnimationFrame};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type FrameCallback = Box<dyn FnMut(&mut Renderer)>;

/// Calls a frame callback once per browser animation frame, after
/// [`Renderer::begin_frame`]. Stops when dropped unless [`forget`][`Self::forget`] is called.
pub struct RenderLoop {
    inner: Rc<RenderLoopInner>,
}

struct RenderLoopInner {
    renderer: RefCell<Renderer>,
    callback: RefCell<FrameCallback>,
    animation_frame: RefCell<Option<AnimationFrame>>,
}

impl RenderLoop {
    /// Takes ownership of `renderer` and starts calling `callback` every frame.
    pub fn start(renderer: Renderer, callback: impl FnMut(&mut Renderer) + 'static) -> Self {
        let inner = Rc::new(RenderLoopInner {
            renderer: RefCell::new(renderer),
            callback: RefCell::new(Box::new(callback)),
            animation_frame: RefCell::new(None),
        });
        RenderLoopInner::schedule(&inner);
        Self { inner }
    }

    /// Keeps the loop running for the life of the page.
    pub fn forget(self) {
        std::mem::forget(self.inner);
    }
}

impl RenderLoopInner {
    fn schedule(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let animation_frame = request_animation_frame(move |_timestamp_ms| {
            // Loop was dropped.
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.frame();
            Self::schedule(&inner);
        });

        // Replaces (and cancels) the frame that is currently running, which is a no-op.
        *this.animation_frame.borrow_mut() = Some(animation_frame);
    }

    fn frame(&self) {
        let mut renderer = self.renderer.borrow_mut();
        renderer.begin_frame();
        (self.callback.borrow_mut())(&mut renderer);
    }
}

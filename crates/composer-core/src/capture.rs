//! Gesture-scoped pointer capture.
//!
//! While a drag, resize, rotate or marquee gesture is active the host must
//! keep delivering pointer moves and releases even when the pointer leaves the
//! element or the page. A [`PointerCapture`] guard owns that subscription: the
//! host listener is attached when the guard is acquired and detached when it
//! is dropped, whether the gesture ends normally, is cancelled, or the owning
//! controller is torn down.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Host-side listener registration.
pub trait CaptureHost {
    /// Start routing global pointer moves/releases to the editor.
    fn attach(&self);
    /// Stop routing them.
    fn detach(&self);
}

/// Host for headless use (tests, batch tools) where there is nothing to attach.
#[derive(Debug, Default)]
pub struct NoopCaptureHost;

impl CaptureHost for NoopCaptureHost {
    fn attach(&self) {}
    fn detach(&self) {}
}

/// Hands out at most one capture at a time.
#[derive(Clone)]
pub struct CaptureSlot {
    host: Rc<dyn CaptureHost>,
    held: Rc<Cell<bool>>,
}

impl fmt::Debug for CaptureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSlot")
            .field("held", &self.held.get())
            .finish()
    }
}

impl Default for CaptureSlot {
    fn default() -> Self {
        Self::new(Rc::new(NoopCaptureHost))
    }
}

impl CaptureSlot {
    pub fn new(host: Rc<dyn CaptureHost>) -> Self {
        Self {
            host,
            held: Rc::new(Cell::new(false)),
        }
    }

    /// Acquire the capture, or `None` if another gesture still holds it.
    pub fn acquire(&self) -> Option<PointerCapture> {
        if self.held.replace(true) {
            return None;
        }
        self.host.attach();
        Some(PointerCapture {
            host: Rc::clone(&self.host),
            held: Rc::clone(&self.held),
        })
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }
}

/// Exclusive capture token. Dropping it detaches the host listener.
pub struct PointerCapture {
    host: Rc<dyn CaptureHost>,
    held: Rc<Cell<bool>>,
}

impl fmt::Debug for PointerCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PointerCapture")
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.host.detach();
        self.held.set(false);
    }
}

use std::fmt;

/// Which part of a scroll container a pointer gesture started on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The scrollbar; `position` is measured along the track from its start
    Bar,
    /// The content canvas; `position` is in screen space along the axis
    Canvas,
}

/// Input events dispatched into a scroll container
///
/// The host translates device input into these once per occurrence; the
/// engine never samples device state on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed
    PointerDown { target: PointerTarget, position: f64 },
    /// Pointer moved while a gesture may be active
    PointerMove { position: f64 },
    /// Pointer released
    PointerUp,
    /// Pointer entered or left the scrollbar
    BarHover { hovered: bool },
    /// Mouse wheel notches (positive = wheel up)
    Wheel { delta: f64 },
}

/// Handle returned by [`ScrollEmitter::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(f64)>;

/// Observer list for scroll offset changes
///
/// Listeners receive the content offset (`-scroll`). They stay registered
/// until explicitly unsubscribed.
#[derive(Default)]
pub struct ScrollEmitter {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl fmt::Debug for ScrollEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ScrollEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for offset changes
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(f64) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Deliver `offset` to every listener in subscription order
    pub fn emit(&mut self, offset: f64) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(offset);
        }
    }
}

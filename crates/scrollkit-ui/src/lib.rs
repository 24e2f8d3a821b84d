pub mod event;
pub mod geometry;
pub mod scroll;
pub mod widgets;

pub use event::{InputEvent, PointerTarget, ScrollEmitter, SubscriptionId};
pub use geometry::{NodeGeometry, NodeId, Point, SceneGraph, Size};
pub use scroll::{AnimationRequest, Axis, ScrollDriver, ScrollMode};
pub use widgets::{HorizontalScrollDriver, ScrollBarView, ScrollContainer};

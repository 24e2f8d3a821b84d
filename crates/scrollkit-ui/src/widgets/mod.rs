mod horizontal;
mod scroll_container;
mod scrollbar;

pub use horizontal::HorizontalScrollDriver;
pub use scroll_container::ScrollContainer;
pub use scrollbar::ScrollBarView;

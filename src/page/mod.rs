pub mod document;
pub mod events;

pub use document::{Document, NodeId, SELECT_MENU_ID};
pub use events::{Event, EventKind, Listener};

pub mod message;

pub use message::{buffer_string, Message, Role};

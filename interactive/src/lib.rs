pub mod input;
pub mod window;
pub use input::{MouseButton, MouseEvent, MouseListener};
pub use window::{Rgb24, Window, WindowBuilder};

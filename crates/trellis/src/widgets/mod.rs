//! Built-in widget kinds.

/// Focusable push button.
pub mod button;
/// Focusable two-state checkbox.
pub mod checkbox;
/// Non-focusable text.
pub mod label;
/// Plain container.
pub mod panel;
/// Scene root widget.
pub(crate) mod root;
/// Text component shared by widgets that draw a string.
pub mod text;

pub use button::Button;
pub use checkbox::Checkbox;
pub use label::Label;
pub use panel::Panel;
pub use root::SceneRoot;
pub use text::TextSpan;

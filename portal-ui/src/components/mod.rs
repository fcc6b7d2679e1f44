//! Reusable UI components

mod form;
mod loading;
mod modal;
mod nav;
mod project_modal;
mod toast;

pub use form::{clear, SelectInput, SubmitButton, TextArea, TextInput, INPUT_CLASS};
pub use loading::{InlineLoading, Loading};
pub use modal::Modal;
pub use nav::Nav;
pub use project_modal::ProjectModal;
pub use toast::Toast;

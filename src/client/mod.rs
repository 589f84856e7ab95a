//! Terminal rendition of the registration form.

pub mod api;
pub mod form;

pub use api::{ApiReply, ClientError, HttpRegistrationApi, RegistrationApi};
pub use form::{FormFields, FormPhase, FormView, Notice, RegistrationForm, SubmitControl};

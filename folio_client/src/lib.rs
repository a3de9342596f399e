//! Client-side counterpart of the contact endpoint: a UI-framework-agnostic
//! form controller that tracks field state, the local cooldown countdown and
//! the submission lifecycle, plus the HTTP transport and the persisted
//! last-sent timestamp it relies on.

pub mod api;
pub mod form;
pub mod store;

pub use api::{ContactApi, ContactApiError, ContactApiResponse, ReqwestContactApi};
pub use form::{ContactForm, ContactFormConfig, FormFields, FormPhase};
pub use store::{FileLastSentStore, LastSentStore, MemoryLastSentStore};

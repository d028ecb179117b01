pub mod banner;
pub mod compose;
pub mod handler;
pub mod transport;

pub use crate::domain::ports::{ConfigProvider, ContactForm, Mailer, Verifier};

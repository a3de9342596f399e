pub mod contact;

pub use email_address::EmailAddress;

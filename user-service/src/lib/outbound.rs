pub mod events;
pub mod mailer;
pub mod repositories;

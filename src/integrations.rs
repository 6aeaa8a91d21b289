pub mod groq;
pub mod mailer;
pub mod sheets;

pub mod flash;
pub mod message;
pub mod settings;
pub mod thread;
pub mod user;

pub mod contact;
pub mod engine;
pub mod handlers;
pub mod keywords;
pub mod prompt;

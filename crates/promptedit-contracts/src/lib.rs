pub mod chat;
pub mod events;
pub mod plan;
pub mod tools;

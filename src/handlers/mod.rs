pub mod content;
pub mod health;
pub mod payment;
pub mod task;
pub mod user;

pub mod crypto;
pub mod user_agent;

pub mod common;
mod concurrent_authentication;

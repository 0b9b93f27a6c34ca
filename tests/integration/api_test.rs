//! API endpoint integration tests
//!
//! Drives the composed router end to end: tokens, secrets, passwords,
//! events and the middleware stack.

#![allow(dead_code)]

mod common;
mod events;
mod middleware;
mod passwords;
mod secrets;
mod tokens;

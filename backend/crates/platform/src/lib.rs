//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Bearer token extraction from HTTP headers
//! - Outbound mail delivery (SMTP)

pub mod bearer;
pub mod mail;
pub mod password;

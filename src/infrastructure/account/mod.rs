//! Account infrastructure: password hashing, persistence, lifecycle service

pub mod password;
pub mod repository;
pub mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::InMemoryAccountRepository;
pub use service::{AccountService, OnboardingRequest, SignupRequest};

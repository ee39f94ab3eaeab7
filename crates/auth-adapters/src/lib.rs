//! Identity adapters for FilmSay.
//!
//! [`Argon2Hasher`] implements the `CredentialHasher` port; [`SessionStore`]
//! maps opaque bearer tokens to account ids. The domain never sees either
//! mechanism, only verified actors.

pub mod hasher;
pub mod sessions;

pub use hasher::Argon2Hasher;
pub use sessions::SessionStore;

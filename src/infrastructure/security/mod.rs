mod argon2_hasher;
mod session_signer;

pub use argon2_hasher::Argon2PasswordHasher;
pub use session_signer::SessionSigner;

//! Backend seam — identity provider and profile table access.
//!
//! The gate, step writes, session context, and deletion service all talk
//! to the backend through these traits, so each can be exercised with the
//! in-memory backend while production wires up the Supabase HTTP backend.

pub mod memory;
pub mod supabase;
pub mod traits;

pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;
pub use traits::{AuthUser, IdentityProvider, ProfileStore};

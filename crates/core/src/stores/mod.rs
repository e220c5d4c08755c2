pub mod memory;
pub mod supabase;

pub use memory::InMemoryIndex;
pub use supabase::SupabaseStore;

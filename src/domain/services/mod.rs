pub mod cache;
pub mod events;
pub mod ring_buffer;
pub mod trie;

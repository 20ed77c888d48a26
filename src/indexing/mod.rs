pub mod dictionary;
pub mod graph_index;
pub mod index_base;
pub mod triple_store;

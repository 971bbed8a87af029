pub mod collection_state;

pub mod item_service;
pub mod search_index;

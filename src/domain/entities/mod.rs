pub mod edit;
pub mod selection;
pub mod store;
pub mod table;

pub mod edit_service;
pub mod export_service;
pub mod import_service;
pub mod modal_service;
pub mod selection_service;

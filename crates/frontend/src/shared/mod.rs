pub mod api_utils;
pub mod list_utils;
pub mod modal;
pub mod modal_url;
pub mod state;

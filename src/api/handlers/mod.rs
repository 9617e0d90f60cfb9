//! HTTP request handlers organized by resource type

pub mod forms;
pub mod health;

pub use forms::{
    create_form_handler, delete_form_handler, get_form_handler, list_forms_handler,
    update_form_handler,
};
pub use health::health_handler;

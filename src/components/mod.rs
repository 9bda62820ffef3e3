pub mod auth_panel;
pub mod catalogue;
pub mod change_password;
pub mod city_picker;
pub mod field_errors;
pub mod navbar;
pub mod profile_page;
pub mod search;

pub mod json_settings;

pub mod domain;
pub mod error;
pub mod presets;
pub mod protocol;

//! # Formation settings
//!
//! Configuration shared by the field renderer and the block adapters: the
//! namespace used to prefix handles and option keys, asset locations, upload
//! locations, context-wide style classes and the sprite registry.
//!
//! Settings are plain serde structures and are usually loaded from TOML:
//!
//! ```
//! use formation_conf::Settings;
//!
//! let settings = Settings::from_toml_str(r#"
//! namespace = "acme"
//!
//! [classes]
//! input = "c-input"
//!
//! [sprites.caret]
//! w = 10
//! h = 6
//! "#).unwrap();
//!
//! assert_eq!(settings.namespace, "acme");
//! assert_eq!(settings.classes.input, "c-input");
//! assert_eq!(settings.sprite("caret").map(|s| s.w), Some(10));
//! ```

pub mod settings;

pub use settings::{Settings, SettingsError, SettingsResult, Sprite, StyleClasses};

//! Scriptlet catalog and injection code generator for content blocking.
//!
//! ```no_run
//! use scriptlets::{invoke, Source};
//!
//! let source = Source::new("set-constant").with_args(["ads.enabled", "false"]);
//! let code = invoke(&source)?;
//! # Ok::<(), scriptlets::ScriptletError>(())
//! ```

pub mod config;
pub mod content_filter;
pub mod scriptlets;
pub mod source;

pub use content_filter::{ContentFilterManager, FilterLoader, RuleSyntax, ScriptletRule};
pub use scriptlets::{
    convert_to_canonical, get_scriptlet_code, get_scriptlet_function, is_valid_scriptlet_name,
    list_scriptlets, InjectionContext, ScriptletError, ScriptletFunction, ScriptletKind,
};
pub use source::{Engine, Source};

/// Generate injectable code for a source descriptor
pub use scriptlets::get_scriptlet_code as invoke;

/// Crate version
pub const VERSION: &str = config::APP_VERSION;

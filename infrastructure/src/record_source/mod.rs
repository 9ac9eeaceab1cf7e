//! Record source adapters

pub mod apps_script;
pub mod protocol;

pub use apps_script::{AppsScriptError, AppsScriptRecordSource};

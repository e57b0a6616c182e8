pub mod ast;
pub mod compiler;
pub mod graph;
pub mod layout;
pub mod sql;

use wasm_bindgen::prelude::*;

pub use compiler::{ImportError, compile, import_sql};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Import SQL DDL as a canvas graph document (JSON)
#[wasm_bindgen(js_name = "importSql")]
pub fn import_sql_js(source: &str) -> Result<String, String> {
    compiler::import_sql(source).map_err(|e| e.to_string())
}

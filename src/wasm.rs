use crate::entry_list::RejectedLine;
use crate::log::init_logger;
use crate::puzzle::{self, PuzzleError};
use wasm_bindgen::prelude::*;

use serde_wasm_bindgen::to_value;

/// Structured error information for JavaScript consumers
#[derive(serde::Serialize)]
struct WasmError {
    /// Error code (e.g., "P001", "C005")
    code: String,
    /// Display message
    message: String,
    /// Short description of error type
    description: String,
    /// Detailed explanation
    details: String,
    /// Optional helpful suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

impl From<PuzzleError> for WasmError {
    fn from(e: PuzzleError) -> Self {
        // report the inner error's message, not the pipeline prefix
        let message = match &e {
            PuzzleError::Pack(inner) => inner.to_string(),
            PuzzleError::Codec(inner) => inner.to_string(),
        };
        WasmError {
            code: e.code().to_string(),
            message,
            description: e.description().to_string(),
            details: e.details().to_string(),
            help: e.help().map(|s| s.to_string()),
        }
    }
}

impl From<WasmError> for JsValue {
    fn from(e: WasmError) -> Self {
        let mut msg = format!("Error {}: {}", e.code, e.message);

        if !e.details.is_empty() {
            msg.push_str(&format!("\n\n{}", e.details));
        }

        if let Some(help) = e.help {
            msg.push_str(&format!("\n\nSuggestion: {help}"));
        }

        js_sys::Error::new(&msg).into()
    }
}

fn serialization_error(what: &str, e: serde_wasm_bindgen::Error) -> JsValue {
    WasmError {
        code: "WASM001".to_string(),
        message: format!("serialization failed: {e}"),
        description: format!("Failed to serialize {what}"),
        details: format!("The {what} could not be converted to JavaScript format."),
        help: Some("This is an internal error. Please report this issue.".to_string()),
    }
    .into()
}

/// Initialize logging and the panic hook with the specified debug setting.
///
/// This function must be called from JavaScript after the WASM module loads.
#[wasm_bindgen]
pub fn initialize(debug_enabled: bool) {
    console_error_panic_hook::set_once();
    init_logger(debug_enabled);

    log::info!("WASM module initialized");
}

#[derive(serde::Serialize)]
struct WasmRejectedLine {
    line: usize,
    code: String,
    message: String,
}

impl From<&RejectedLine> for WasmRejectedLine {
    fn from(r: &RejectedLine) -> Self {
        WasmRejectedLine {
            line: r.line_number,
            code: r.error.code().to_string(),
            message: r.error.to_string(),
        }
    }
}

#[derive(serde::Serialize)]
struct WasmGenerated {
    token: String,
    placed: usize,
    dropped: Vec<String>,
    truncated: Vec<String>,
    rejected: Vec<WasmRejectedLine>,
}

/// JS entry for the authoring page: takes the `ANSWER=CLUE` text and returns
/// `{ token, placed, dropped, truncated, rejected }`.
#[wasm_bindgen]
pub fn generate_puzzle_code(text: &str) -> Result<JsValue, JsValue> {
    let generated = puzzle::generate(text).map_err(WasmError::from)?;

    let result = WasmGenerated {
        placed: generated.placements.len(),
        rejected: generated.rejected.iter().map(WasmRejectedLine::from).collect(),
        token: generated.token,
        dropped: generated.dropped,
        truncated: generated.truncated,
    };

    to_value(&result).map_err(|e| serialization_error("generated puzzle", e))
}

/// JS entry for the solving page: accepts a bare code or the whole page URL and
/// returns `{ placements, grids }`.
#[wasm_bindgen]
pub fn load_puzzle(input: &str) -> Result<JsValue, JsValue> {
    let loaded = puzzle::load(input).map_err(WasmError::from)?;
    to_value(&loaded).map_err(|e| serialization_error("puzzle", e))
}

/// Generate a debug report for troubleshooting.
///
/// # Arguments
/// * `input` - The author text or puzzle code being processed
/// * `error_message` - The error message that was displayed
#[wasm_bindgen]
pub fn get_debug_info(input: &str, error_message: &str) -> String {
    use std::fmt::Write;
    let mut report = String::new();

    // NB: writing to a String never fails
    let _ = writeln!(&mut report, "=== CROSSWORD LINK DEBUG REPORT ===");
    let _ = writeln!(&mut report, "Version: {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"));
    let _ = writeln!(&mut report, "Generated: {}", js_sys::Date::new_0().to_iso_string().as_string().unwrap_or_else(|| "unknown".to_string()));
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Error");
    let _ = writeln!(&mut report, "{error_message}");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Input");
    let _ = writeln!(&mut report, "Lines: {}", input.lines().count());
    let _ = writeln!(&mut report, "{input}");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Environment");
    if let Some(window) = web_sys::window() {
        if let Ok(user_agent) = window.navigator().user_agent() {
            let _ = writeln!(&mut report, "User Agent: {user_agent}");
        }
        let _ = writeln!(&mut report, "Location: {}", window.location().href().unwrap_or_else(|_| "unknown".to_string()));
    }
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "Please copy this entire report and paste it when reporting the issue.");
    let _ = writeln!(&mut report, "=== END DEBUG REPORT ===");

    report
}

//! FFI interface for C/C++ hosts
//!
//! HTML and requests go in as UTF-8 buffers / C strings, results come back as
//! JSON in Rust-owned C strings that must be released with
//! `free_autofill_result`.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;

use crate::channel::{parse_value_manifest, FillCompleteMessage};
use crate::config::AutofillConfig;
use crate::dom::Document;
use crate::error::{AutofillError, Result};
use crate::extractors::extract_fields_with;
use crate::fillers::fill_fields_with;

/// Result struct returned to the host.
/// Both pointers are owned by Rust and must be freed via free_autofill_result
#[repr(C)]
pub struct AutofillResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the call failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Fill response: the fill_complete message plus the filled document
#[derive(Serialize)]
struct FillResponse<'a> {
    #[serde(flatten)]
    message: FillCompleteMessage<'a>,
    html: String,
}

/// Extract the Field Manifest from an HTML document.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `config_json` - JSON-serialized AutofillConfig (null-terminated), or null for defaults
///
/// # Returns
/// AutofillResultFFI with json_ptr set to `{fields, fieldCount}` or error_ptr set
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `config_json` must be null or a valid null-terminated C string
/// - Caller must free the result via `free_autofill_result`
#[no_mangle]
pub unsafe extern "C" fn autofill_extract_fields(
    html_ptr: *const c_char,
    html_len: usize,
    config_json: *const c_char,
) -> AutofillResultFFI {
    into_ffi_result(extract_json(html_ptr, html_len, config_json))
}

/// Fill an HTML document from a Value Manifest.
///
/// # Returns
/// AutofillResultFFI with json_ptr set to
/// `{event: "fill_complete", filled, skipped, results, html}` or error_ptr set.
/// A malformed manifest is reported as an error and nothing is filled.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `mappings_json` must be a valid null-terminated C string
/// - `config_json` must be null or a valid null-terminated C string
/// - Caller must free the result via `free_autofill_result`
#[no_mangle]
pub unsafe extern "C" fn autofill_fill_fields(
    html_ptr: *const c_char,
    html_len: usize,
    mappings_json: *const c_char,
    config_json: *const c_char,
) -> AutofillResultFFI {
    into_ffi_result(fill_json(html_ptr, html_len, mappings_json, config_json))
}

/// Free an AutofillResultFFI returned by this module
///
/// # Safety
/// - `result` must have been returned by an `autofill_*` function
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_autofill_result(result: AutofillResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn extract_json(
    html_ptr: *const c_char,
    html_len: usize,
    config_json: *const c_char,
) -> Result<String> {
    let html = read_html(html_ptr, html_len)?;
    let config = read_config(config_json)?;

    let doc = Document::parse(html);
    let manifest = extract_fields_with(&doc, &config);
    to_json("field manifest", &manifest)
}

unsafe fn fill_json(
    html_ptr: *const c_char,
    html_len: usize,
    mappings_json: *const c_char,
    config_json: *const c_char,
) -> Result<String> {
    let html = read_html(html_ptr, html_len)?;
    let entries = parse_value_manifest(read_c_str(mappings_json, "mappings JSON")?)?;
    let config = read_config(config_json)?;

    let mut doc = Document::parse(html);
    let report = fill_fields_with(&mut doc, &entries, &config);
    let response = FillResponse {
        message: FillCompleteMessage::new(&report),
        html: doc.to_html(),
    };
    to_json("fill report", &response)
}

unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| AutofillError::InvalidUtf8("HTML content"))
}

unsafe fn read_c_str<'a>(ptr: *const c_char, what: &'static str) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(AutofillError::NullPointer(what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| AutofillError::InvalidUtf8(what))
}

unsafe fn read_config(config_json: *const c_char) -> Result<AutofillConfig> {
    if config_json.is_null() {
        return Ok(AutofillConfig::default());
    }
    AutofillConfig::from_json(read_c_str(config_json, "config JSON")?)
}

fn to_json<T: Serialize>(what: &'static str, payload: &T) -> Result<String> {
    serde_json::to_string(payload).map_err(|source| AutofillError::Serialize { what, source })
}

fn into_ffi_result(result: Result<String>) -> AutofillResultFFI {
    let json = match result {
        Ok(json) => json,
        Err(e) => {
            log::error!("{e}");
            return make_error_result(&e.to_string());
        }
    };
    match CString::new(json) {
        Ok(cstr) => AutofillResultFFI {
            json_ptr: cstr.into_raw(),
            error_ptr: ptr::null_mut(),
        },
        Err(_) => make_error_result("Result JSON contains null bytes"),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> AutofillResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    AutofillResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

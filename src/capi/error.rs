//! Thread-local error slot for the C ABI.
//!
//! Calls that fail store a message here and return their "no value" result.
//! Callers read it with [`odgi_last_error`].

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Stores `msg` for later retrieval via [`odgi_last_error`].
pub(crate) fn set_last_error(msg: &str) {
    LAST_ERROR.with(|cell| {
        // Interior NULs would make the message unrepresentable; strip them.
        let sanitized = msg.replace('\0', " ");
        *cell.borrow_mut() = CString::new(sanitized).ok();
    });
}

/// Borrows a NUL-terminated UTF-8 string, recording an error on failure.
pub(crate) fn str_from_ptr<'a>(ptr: *const c_char, what: &str) -> Option<&'a str> {
    if ptr.is_null() {
        set_last_error(&format!("null {what} pointer"));
        return None;
    }
    // SAFETY: Caller guarantees ptr is a valid, NUL-terminated C string that
    // outlives the returned borrow.
    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            set_last_error(&format!("{what} is not valid UTF-8"));
            None
        }
    }
}

/// Returns the last error message on this thread, or null if there is none.
///
/// The pointer stays valid until the next failing call or
/// [`odgi_clear_error`] on the same thread. Do not free it.
#[no_mangle]
pub extern "C" fn odgi_last_error() -> *const c_char {
    LAST_ERROR.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |s| s.as_ptr())
    })
}

/// Clears the last error on this thread.
#[no_mangle]
pub extern "C" fn odgi_clear_error() {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

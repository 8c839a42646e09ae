//! objx runtime bridge (`libobjx_rt`)
//!
//! The native side of a process whose entry point is a managed function.
//! The C launcher produced by `objxc entry --launcher` defines `main` and
//! hands `argc`/`argv` together with the mangled entry symbol to
//! [`objx_run_main`], which:
//!
//! 1. bootstraps the runtime once ([`objx_runtime_init`])
//! 2. copies `argv[1..]` into an owned [`ObjxArray`] of UTF-8 strings
//! 3. calls the entry function with a pointer to that array
//! 4. releases the array and returns `0`
//!
//! # Build Modes
//!
//! - **rlib**: for Rust consumers and tests
//! - **staticlib**: linked into the launcher (`libobjx_rt.a`)

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    unsafe_code,
    reason = "C-ABI entry points read argv and hand out raw buffers"
)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "lengths cross the ABI as i64"
)]

use std::ffi::{c_char, CStr};
use std::panic;
use std::ptr;
use std::sync::Once;

/// A managed string: `{ i64 len, *const u8 data }`.
///
/// Always valid UTF-8. The bytes are owned by the enclosing [`ObjxArray`].
#[repr(C)]
#[derive(Debug)]
pub struct ObjxString {
    pub len: i64,
    pub data: *const u8,
}

impl ObjxString {
    /// Copy `bytes`, replacing invalid UTF-8 sequences with U+FFFD.
    fn copy_from(bytes: &[u8]) -> Self {
        let owned: Box<[u8]> = String::from_utf8_lossy(bytes)
            .into_owned()
            .into_bytes()
            .into_boxed_slice();
        let len = owned.len() as i64;
        ObjxString {
            len,
            data: Box::into_raw(owned).cast::<u8>(),
        }
    }

    /// View the string.
    ///
    /// # Safety
    /// `data` must point to `len` bytes of UTF-8 that outlive the borrow.
    pub unsafe fn as_str(&self) -> &str {
        if self.data.is_null() || self.len <= 0 {
            return "";
        }
        let bytes = std::slice::from_raw_parts(self.data, self.len as usize);
        std::str::from_utf8_unchecked(bytes)
    }

    /// # Safety
    /// `self` must come from [`ObjxString::copy_from`] and not be released yet.
    unsafe fn release(&self) {
        if self.data.is_null() {
            return;
        }
        let slice = ptr::slice_from_raw_parts_mut(self.data.cast_mut(), self.len.max(0) as usize);
        drop(Box::from_raw(slice));
    }
}

/// A managed array of strings: `{ i64 len, i64 cap, *mut ObjxString data }`.
///
/// `data` is null when the array is empty.
#[repr(C)]
#[derive(Debug)]
pub struct ObjxArray {
    pub len: i64,
    pub cap: i64,
    pub data: *mut ObjxString,
}

impl ObjxArray {
    pub const EMPTY: ObjxArray = ObjxArray {
        len: 0,
        cap: 0,
        data: ptr::null_mut(),
    };

    /// Build an owned array; release it with [`objx_array_free`].
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let elements: Box<[ObjxString]> = strings
            .into_iter()
            .map(|s| ObjxString::copy_from(s.as_ref()))
            .collect();
        if elements.is_empty() {
            return ObjxArray::EMPTY;
        }
        let len = elements.len() as i64;
        ObjxArray {
            len,
            cap: len,
            data: Box::into_raw(elements).cast::<ObjxString>(),
        }
    }

    /// The elements.
    ///
    /// # Safety
    /// The array must be live: built by this crate and not yet freed.
    pub unsafe fn as_slice(&self) -> &[ObjxString] {
        if self.data.is_null() || self.len <= 0 {
            return &[];
        }
        std::slice::from_raw_parts(self.data, self.len as usize)
    }

    /// Copy the elements out as Rust strings.
    ///
    /// # Safety
    /// Same as [`ObjxArray::as_slice`].
    pub unsafe fn to_strings(&self) -> Vec<String> {
        self.as_slice()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect()
    }
}

/// Signature of a managed entry function.
///
/// `C-unwind` lets a failure in the entry function reach
/// [`objx_run_main`] instead of aborting at the ABI boundary.
pub type EntryPoint = extern "C-unwind" fn(*mut ObjxArray);

static INIT: Once = Once::new();

/// Bootstrap the runtime. Safe to call any number of times; only the
/// first call has an effect.
///
/// Installs a panic hook that reports uncaught failures of managed code
/// on stderr without a Rust backtrace.
#[no_mangle]
pub extern "C" fn objx_runtime_init() {
    INIT.call_once(|| {
        panic::set_hook(Box::new(|info| {
            let payload = info.payload();
            let message = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("unknown failure");
            eprintln!("objx: uncaught failure in entry point: {message}");
        }));
    });
}

/// Convert C `argc`/`argv` to a managed string array.
///
/// Skips `argv[0]` (the program name): the entry function receives only
/// user-supplied arguments. The strings are copied, so the array does not
/// depend on the lifetime of `argv`. A null `argv` entry becomes an empty
/// string.
#[no_mangle]
pub extern "C" fn objx_args_from_argv(argc: i32, argv: *const *const c_char) -> ObjxArray {
    if argc <= 1 || argv.is_null() {
        return ObjxArray::EMPTY;
    }
    let count = (argc - 1) as usize;
    ObjxArray::from_strings((0..count).map(|i| {
        // SAFETY: the launcher passes the argv it received, valid for argc entries
        let arg = unsafe { *argv.add(i + 1) };
        if arg.is_null() {
            &[][..]
        } else {
            // SAFETY: non-null argv entries are NUL-terminated C strings
            unsafe { CStr::from_ptr(arg) }.to_bytes()
        }
    }))
}

/// Release an array built by [`objx_args_from_argv`] or
/// [`ObjxArray::from_strings`] and reset it to empty. The `ObjxArray`
/// header itself belongs to the caller.
#[no_mangle]
pub extern "C" fn objx_array_free(array: *mut ObjxArray) {
    if array.is_null() {
        return;
    }
    // SAFETY: caller passes a live array built by this crate
    unsafe {
        let array = &mut *array;
        if !array.data.is_null() && array.len > 0 {
            let slice = ptr::slice_from_raw_parts_mut(array.data, array.len as usize);
            let elements = Box::from_raw(slice);
            for element in elements.iter() {
                element.release();
            }
        }
        *array = ObjxArray::EMPTY;
    }
}

/// Run a managed entry function as the process body.
///
/// Returns `0` when the entry function returns. Returns `1` when it fails
/// with an uncaught panic or when `entry` is null.
#[no_mangle]
pub extern "C" fn objx_run_main(
    argc: i32,
    argv: *const *const c_char,
    entry: Option<EntryPoint>,
) -> i32 {
    objx_runtime_init();
    let Some(entry) = entry else {
        eprintln!("objx: no entry point");
        return 1;
    };

    let mut args = objx_args_from_argv(argc, argv);
    let args_ptr = ptr::addr_of_mut!(args);
    let result = panic::catch_unwind(panic::AssertUnwindSafe(|| entry(args_ptr)));
    objx_array_free(args_ptr);

    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

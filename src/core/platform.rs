//! Platform variants and their naming conventions.
//!
//! A variant is a short platform tag such as `linux64` or `win32`. Output
//! file naming (executable suffix, shared-library prefix/suffix) is a pure
//! function of the variant.

/// Known variants.
pub const VARIANTS: &[&str] = &["linux64", "linux32", "win64", "win32", "macos64"];

/// Detect the host variant.
///
/// Returns `None` on hosts this table does not know.
pub fn host_platform() -> Option<&'static str> {
    detect(std::env::consts::OS, usize::BITS)
}

/// Map an OS name (as in `std::env::consts::OS`) and pointer width to a variant.
pub fn detect(os: &str, pointer_bits: u32) -> Option<&'static str> {
    match (os, pointer_bits) {
        ("linux", 64) => Some("linux64"),
        ("linux", 32) => Some("linux32"),
        ("windows", 64) => Some("win64"),
        ("windows", 32) => Some("win32"),
        ("macos", 64) => Some("macos64"),
        _ => None,
    }
}

pub fn is_windows(variant: &str) -> bool {
    matches!(variant, "win64" | "win32")
}

pub fn is_linux(variant: &str) -> bool {
    matches!(variant, "linux64" | "linux32")
}

pub fn is_macos(variant: &str) -> bool {
    variant == "macos64"
}

/// Executable file extension, without the dot. Empty where executables
/// carry no extension.
pub fn executable_extension(variant: &str) -> &'static str {
    if is_windows(variant) {
        "exe"
    } else {
        ""
    }
}

/// Shared library file extension, without the dot.
pub fn shared_library_extension(variant: &str) -> &'static str {
    if is_windows(variant) {
        "dll"
    } else if is_macos(variant) {
        "dylib"
    } else {
        "so"
    }
}

/// Shared library file name prefix.
pub fn shared_library_prefix(variant: &str) -> &'static str {
    if is_windows(variant) {
        ""
    } else {
        "lib"
    }
}

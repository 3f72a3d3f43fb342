#![no_main]

use libfuzzer_sys::fuzz_target;

use criba::policy::{BindingSpec, DEFAULT_DEBOUNCE_MS};

fuzz_target!(|data: &[u8]| {
    if let Ok(expr) = std::str::from_utf8(data) {
        let _ = BindingSpec::from_expr(expr, DEFAULT_DEBOUNCE_MS);
    }
});

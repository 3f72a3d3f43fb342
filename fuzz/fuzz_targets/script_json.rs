#![no_main]

use libfuzzer_sys::fuzz_target;

use criba::pages::Page;
use criba::policy::DEFAULT_DEBOUNCE_MS;
use criba::script::Script;
use criba::session::replay;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(script) = Script::from_json(json) else {
        return;
    };
    let page = script.page.unwrap_or(Page::Areas);
    let spec = page.binding_spec(DEFAULT_DEBOUNCE_MS);
    let form = script.form_candidate(None);
    let _ = replay(&script, form, &spec, true);
});

#![no_main]

//! Action text fuzzer.
//!
//! Any text either fails to parse or parses into an action whose display
//! form parses back to the same action.

use kore::ShipyardAction;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    if let Ok(action) = text.parse::<ShipyardAction>() {
        let rendered = action.to_string();
        assert_eq!(rendered.parse::<ShipyardAction>().ok(), Some(action));
    }
});

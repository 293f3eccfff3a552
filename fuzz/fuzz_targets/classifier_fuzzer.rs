//! Fuzz target for rejection classification
//!
//! Every code maps to exactly one category with a non-empty message, and
//! only a nickname conflict is retryable.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomjoin_core::{CODE_CONFLICT, ReasonCategory, classify};

fuzz_target!(|code: u16| {
    let reason = classify(code);

    assert!(!reason.to_string().is_empty());
    assert_eq!(reason.is_terminal(), code != CODE_CONFLICT);
    assert_eq!(reason == ReasonCategory::NicknameConflict, code == CODE_CONFLICT);
    assert_eq!(classify(code), reason);
});

//! Fuzz target for nickname candidates
//!
//! Any accepted base nickname yields nine distinct candidates, the first of
//! which is the trimmed base itself.

#![no_main]

use std::collections::HashSet;

use libfuzzer_sys::fuzz_target;
use roomjoin_core::{ATTEMPT_LIMIT, Nickname};

fuzz_target!(|text: &str| {
    let Ok(nickname) = Nickname::new(text) else {
        assert!(text.trim().is_empty());
        return;
    };

    let candidates: Vec<(u32, String)> = nickname.candidates().collect();
    assert_eq!(candidates.len(), (ATTEMPT_LIMIT - 1) as usize);
    assert_eq!(candidates[0].1, text.trim());

    let distinct: HashSet<&str> = candidates.iter().map(|(_, c)| c.as_str()).collect();
    assert_eq!(distinct.len(), candidates.len());

    for (attempt, candidate) in &candidates {
        assert!(candidate.starts_with(nickname.as_str()));
        assert_eq!(*candidate, nickname.candidate(*attempt));
    }
});

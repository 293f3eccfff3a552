//! Fuzz target for room identifier construction
//!
//! Parsing and building from a human name must never panic, and whatever
//! they accept must be trimmed, whitespace-free and stable under reparsing.
//! Names built with `from_name` keep every `@` of the name escaped, so the
//! first `@` always separates the escaped name from the service.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roomjoin_core::{RoomId, escape_local_part};

#[derive(Debug, Arbitrary)]
enum Input {
    Parse(String),
    FromName { name: String, service: String },
}

fuzz_target!(|input: Input| {
    match input {
        Input::Parse(text) => {
            if let Ok(room) = RoomId::parse(&text) {
                assert_eq!(room.as_str(), text.trim());
                assert!(!room.as_str().chars().any(char::is_whitespace));
                assert_eq!(RoomId::parse(room.as_str()).ok(), Some(room));
            }
        },
        Input::FromName { name, service } => {
            if let Ok(room) = RoomId::from_name(&name, &service) {
                assert_eq!(room.local_part(), Some(escape_local_part(name.trim()).as_str()));
                assert_eq!(room.service(), Some(service.trim()));
            }
        },
    }
});

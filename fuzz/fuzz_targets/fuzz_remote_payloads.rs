//! Fuzz target: remote JSON decoders
//!
//! Feeds arbitrary bytes to the verdict, weather and chat-update parsers.
//! None may panic, whatever the input.
//!
//! cargo fuzz run fuzz_remote_payloads

#![no_main]

use gardengate::adapters::biometric::parse_verdict;
use gardengate::adapters::telegram::parse_updates;
use gardengate::adapters::weather::parse_weather;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = parse_verdict(data);
    let _ = parse_updates(data);
    let _ = parse_weather(data);
});

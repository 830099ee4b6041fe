//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the mock platform. All tests run on the host (x86_64) with no
//! real hardware required.

mod access_tests;
mod mock_hw;
mod poller_tests;
mod scheduler_tests;

//! Shared test harness modules for the roundtrip CLI.

use super::*;

mod helpers;

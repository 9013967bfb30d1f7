//! Shared test harness modules for the Dictionaria CLI.

use super::*;

mod helpers;

//! Integration tests for riskguard

mod scenarios_test;
mod session_test;

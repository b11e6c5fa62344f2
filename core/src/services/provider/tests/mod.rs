//! Tests for the email MFA provider


mod lockout_tests;

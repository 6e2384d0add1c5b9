//! Cross-module engine tests driving the fixture backend.

mod template_tests;

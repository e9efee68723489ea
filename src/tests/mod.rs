//! Integration tests for homeboard.
//!
//! Refresh loops driven end to end with a manual clock, slot consistency under
//! concurrent readers, and the read API through the real router.


pub mod support;

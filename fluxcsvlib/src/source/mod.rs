//! Source: the byte stream a response is decoded from.
//!
//! This module handles the first stage of the pipeline - supplying raw
//! bytes. The transport that produces them is not part of this crate; it
//! only has to implement [`Source`]:
//!
//! - **Source**: `Read` plus an explicit, fallible `close`
//! - **CloseWith**: adapt any reader plus a close callback
//!
//! Files, stdin, byte slices and cursors are sources out of the box.

pub mod stream;

pub use stream::{CloseWith, Source};

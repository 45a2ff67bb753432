//! # runtee
//!
//! Run a child process and re-emit its stdout and stderr line by line, each
//! line prepended with a per-stream prefix. Useful for making the output of
//! wrapped programs attributable at a glance, e.g. when tagging error output
//! or telling tools apart in parallel build logs.
//!
//! ```bash
//! runtee -out_prefix "build: " -err_prefix "build! " make -j8
//! ```
//!
//! ## Modules
//!
//! - `cli` - argument parsing and the usage text
//! - `prefix` - line reassembly and prefix injection for chunked streams
//! - `subprocess` - child process lifecycle and stream wiring

pub mod cli;
pub mod prefix;
pub mod subprocess;

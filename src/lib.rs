//! Handle marshalling and a C ABI for a bidirected variation graph.
//!
//! The crate is layered bottom-up:
//!
//! - [`types`]: node, path, step and edge handles plus the error type.
//! - [`storage`]: an immutable in-memory graph loaded from GFA.
//! - [`ffi`]: integer encodings of the handles and [`ffi::GraphRef`], the
//!   typed graph reference whose methods form the flat query surface.
//! - [`capi`]: the same surface as `extern "C"` functions.
//! - [`logging`]: `tracing` subscriber setup.
//!
//! ```no_run
//! use odgi_ffi::ffi::GraphRef;
//!
//! let graph = GraphRef::load("graph.gfa")?;
//! let path = graph.path_handle("chr1");
//! for step in graph.steps_in_path(path) {
//!     let handle = graph.handle_of_step(step);
//!     println!("{}", graph.id(handle));
//! }
//! # Ok::<(), odgi_ffi::types::GraphError>(())
//! ```

pub mod capi;
pub mod ffi;
pub mod logging;
pub mod storage;
pub mod types;

//! # Introduction
//!
//! dsviz simulates classic data structures (binary search tree, singly and
//! doubly linked list, stack, queue) one user-authored operation at a time,
//! recording a replayable trace of micro-steps that drives animation.  The
//! trace is then scrubbed forward and backward or played back through a
//! terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Operation Log → Mutation Engine → Trace → Playback Controller → Layout → TUI
//! ```
//!
//! 1. [`operation`]: the ordered, id-keyed operation log plus the pseudo-code
//!    rendering of it.
//! 2. [`engine`]: one pure module per structure kind that applies a single
//!    operation to a [`engine::Snapshot`] and emits [`engine::Step`]s.
//! 3. [`trace`]: folds a whole log into a flat, seekable [`trace::Trace`].
//! 4. [`stats`]: size/height/min/max/head/tail derived from a snapshot.
//! 5. [`playback`]: animated replay, seeking and auto-play over a
//!    [`playback::Clock`].
//! 6. [`layout`]: 2-D coordinates for tree and list snapshots.
//! 7. [`ui`]: ratatui-based player; not part of the stable library API.
//!
//! ## Supported structures
//!
//! BST: insert, delete, search, in/pre/post/level-order traversal, min, max.
//! Lists: insert/delete at beginning, end and position, delete by value,
//! search, update, forward traversal; the doubly linked list adds backward
//! traversal and before-position insert/delete.
//! Stack: push, pop, peek, size, is_empty.  Queue: enqueue, dequeue, front,
//! rear, size, is_empty.  Every structure can be cleared.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod operation;
pub mod playback;
pub mod script;
pub mod stats;
pub mod trace;
pub mod ui;

//! floe-sched
//!
//! Deterministic scheduling of time-keyed proposals. The heap's ordering is a
//! strict total order over (start time, tx id), so every node that holds the
//! same pending set iterates it identically regardless of insertion order.

pub mod heap;

pub use heap::StartTimeHeap;

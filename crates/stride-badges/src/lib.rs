//! Stride's badge-evaluation engine.
//!
//! Replays a finite, start-time-ordered batch of recorded activities
//! (plus externally-supplied profile facts) through a catalog of
//! independent, stateful evaluators. Each badge irrevocably latches the
//! first time its criterion is satisfied, recording the triggering
//! activity and when it happened.
//!
//! The engine is single-threaded, synchronous, and does no I/O: callers
//! fetch, parse, and sort activities, then feed them through
//! [`BadgeSet::add_activity`] one pass, in order.

pub mod activity;
pub mod badge;
pub mod calendar;
pub mod catalog;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod registry;

pub use activity::{Activity, ProfileFact};
pub use badge::{Badge, Evaluator, Fold, MonthlyProgression};
pub use catalog::{BadgeSpec, FamilySpec, CATALOG, RESERVED_IDS};
pub use error::EngineError;
pub use policy::{Comparison, CounterPolicy, DayWindow, Delta, Measure, Period, WindowBoundary};
pub use registry::{BadgeFailure, BadgeSet};

//! Banner visibility engine: pure dismissal/visibility rules plus a stateful
//! machine that wires a campaign, a persistence backend, and a clock.
//!
//! # Modules
//!
//! - [`visibility`] — Pure transition rules (deadline, dismissal window, reset)
//! - [`clock`] — Wall-clock port with system and manually driven implementations
//! - [`machine`] — Stateful engine with lazy expiry and persist-on-mutation

pub mod clock;
pub mod machine;
pub mod visibility;

pub use clock::{Clock, ManualClock, SystemClock};
pub use machine::BannerMachine;
pub use visibility::Evaluation;

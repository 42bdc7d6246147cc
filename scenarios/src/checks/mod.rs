//! Run-wide outcome accumulators written by scenario code
//!
//! - `ErrorCounter`: the custom `errors` counter, incremented once per failed iteration
//! - `CheckRegistry`: pass/fail tallies per named check
//!
//! Both are cheap to clone and safe to share across virtual-user tasks. Every
//! write is mirrored to the `metrics` facade so whichever recorder the runtime
//! installs sees the same values.

mod counter;
mod registry;

pub use counter::ErrorCounter;
pub use registry::{CheckRegistry, CheckSummary, pass_rate};

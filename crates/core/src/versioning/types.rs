//! Versioning domain types.

/// Version carried by a freshly created entity.
pub const INITIAL_VERSION: i32 = 1;

/// Version bookkeeping for a single archive+overwrite step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionStep {
    /// Live version being superseded. The archived row is stamped with it,
    /// and the overwrite only applies while the live row still carries it.
    pub superseded: i32,
    /// Version the live entity carries after the overwrite.
    pub next: i32,
}

//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity becoming inactive: a contract
/// termination or a resolved maintenance.
#[derive(Clone, Copy, Debug)]
pub struct Closing;

/// Marker type describing the start of a validity period.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing the end of a validity period.
#[derive(Clone, Copy, Debug)]
pub struct End;

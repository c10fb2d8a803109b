//! Static name tables for wire identifiers.
//!
//! Commands and radar variables are addressed by ASCII names on the wire,
//! several of which are aliases of the same thing (`"DACMin"` and `"dac_min"`).
//! `NameTable` maps every accepted spelling to a tagged enum variant so the
//! dispatch code matches on variants instead of comparing strings.
//!
//! Implementations are normally generated with `#[derive(NameTable)]`.

/// Bidirectional mapping between an enum and its wire names.
///
/// Lookup is exact and case-sensitive. The first entry of `names()` is the
/// canonical name of a variant.
pub trait NameTable: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Every accepted name (canonical names and aliases), in declaration order.
    const NAMES: &'static [&'static str];

    /// Resolve a wire name to its variant.
    fn from_name(name: &str) -> Option<Self>;

    /// All names of this variant, canonical first.
    fn names(&self) -> &'static [&'static str];

    /// Canonical name of this variant.
    fn name(&self) -> &'static str {
        self.names().first().copied().unwrap_or("")
    }
}

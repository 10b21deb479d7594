//! Membership oracles that flag hash values for down-weighting.

use std::collections::HashSet;

/// Answers whether a hash value has been flagged, typically because it belongs to a known
/// high-frequency k-mer. The weighted minimizer selector demotes flagged values from candidacy.
///
/// Implementations are expected to answer in O(1) amortized time. Approximate data structures
/// like bloom filters are fine as long as they never report a flagged value as absent.
pub trait MembershipOracle {
    /// Returns true if the given hash value is flagged.
    fn contains(&self, hash: u64) -> bool;
}

impl MembershipOracle for HashSet<u64> {
    fn contains(&self, hash: u64) -> bool {
        HashSet::contains(self, &hash)
    }
}

impl<OracleType: MembershipOracle> MembershipOracle for &OracleType {
    fn contains(&self, hash: u64) -> bool {
        (**self).contains(hash)
    }
}

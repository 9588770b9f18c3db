//! Helpers shared by modules, the ledger and their tests.

use digest::Digest;

use crate::module::Spec;

/// Derives a deterministic address from an arbitrary seed by hashing it with
/// the context's hasher.
pub fn generate_address<C: Spec>(key: &str) -> C::Address {
    let hash: [u8; 32] = <C as Spec>::Hasher::digest(key.as_bytes()).into();
    C::Address::from(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::DefaultContext;

    #[test]
    fn generated_addresses_are_stable_and_distinct() {
        let a = generate_address::<DefaultContext>("alice");
        assert_eq!(a, generate_address::<DefaultContext>("alice"));
        assert_ne!(a, generate_address::<DefaultContext>("bob"));
        assert!(a.to_string().starts_with("vote1"));
    }
}

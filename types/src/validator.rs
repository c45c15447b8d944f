//! Validators and validator sets.

use serde::{Deserialize, Serialize};

use crate::{HexBytes, PublicKey};

/// A single validator with its voting power.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// First 20 bytes of SHA-256 of the public key.
    pub address: HexBytes,
    pub pub_key: PublicKey,
    pub voting_power: i64,
    pub proposer_priority: i64,
}

/// An ordered set of validators active at some height.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSet {
    pub validators: Vec<Validator>,
    pub proposer: Option<Validator>,
}

impl ValidatorSet {
    pub fn new(validators: Vec<Validator>) -> Self {
        let proposer = validators
            .iter()
            .max_by_key(|v| v.proposer_priority)
            .cloned();
        Self {
            validators,
            proposer,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn size(&self) -> usize {
        self.validators.len()
    }

    pub fn total_voting_power(&self) -> i64 {
        self.validators
            .iter()
            .map(|v| v.voting_power)
            .fold(0i64, i64::saturating_add)
    }

    pub fn get_by_address(&self, address: &HexBytes) -> Option<&Validator> {
        self.validators.iter().find(|v| &v.address == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(seed: u8, power: i64, priority: i64) -> Validator {
        Validator {
            address: HexBytes::new(vec![seed; 20]),
            pub_key: PublicKey([seed; 32]),
            voting_power: power,
            proposer_priority: priority,
        }
    }

    #[test]
    fn proposer_is_highest_priority() {
        let set = ValidatorSet::new(vec![validator(1, 10, 5), validator(2, 10, 9)]);
        assert_eq!(set.proposer.unwrap().address, HexBytes::new(vec![2; 20]));
    }

    #[test]
    fn total_power_sums() {
        let set = ValidatorSet::new(vec![validator(1, 10, 0), validator(2, 32, 0)]);
        assert_eq!(set.total_voting_power(), 42);
        assert_eq!(set.size(), 2);
    }

    #[test]
    fn empty_set_has_no_proposer() {
        let set = ValidatorSet::new(vec![]);
        assert!(set.is_empty());
        assert!(set.proposer.is_none());
    }

    #[test]
    fn lookup_by_address() {
        let set = ValidatorSet::new(vec![validator(7, 1, 0)]);
        assert!(set.get_by_address(&HexBytes::new(vec![7; 20])).is_some());
        assert!(set.get_by_address(&HexBytes::new(vec![8; 20])).is_none());
    }
}

//! Fee pricing and value transfer collaborators.
//!
//! Endorsements carry a fee. The ledger never holds balances itself; it
//! asks a [`FeeOracle`] what to charge and a [`ValueTransfer`] to move
//! the value, both injected at construction. [`MemoryBank`] is the
//! reference implementation used by tests.

use std::collections::HashMap;
use std::sync::Mutex;

use kinship_core::Address;
use thiserror::Error;

/// Errors from value-transfer implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    /// The payer cannot cover the total.
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },
}

/// Prices the endorsement fee.
///
/// Read at call time on every endorsement, never cached, so a repriced
/// oracle takes effect immediately.
pub trait FeeOracle: Send + Sync {
    fn endorsement_fee(&self) -> u64;
}

/// A fixed fee.
#[derive(Debug, Clone, Copy)]
pub struct FlatFee(pub u64);

impl FeeOracle for FlatFee {
    fn endorsement_fee(&self) -> u64 {
        self.0
    }
}

/// Moves value between addresses.
///
/// `transfer_split` is a single atomic call: either the payer covers the
/// whole total and every recipient is credited, or nothing moves. This
/// is what keeps a two-way fee split from half-applying.
pub trait ValueTransfer: Send + Sync {
    fn transfer_split(
        &self,
        from: &Address,
        recipients: &[(Address, u64)],
    ) -> Result<(), EconomyError>;
}

/// In-memory balance map implementing [`ValueTransfer`].
pub struct MemoryBank {
    balances: Mutex<HashMap<Address, u64>>,
}

impl MemoryBank {
    /// An empty bank.
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
        }
    }

    /// Credit an address.
    pub fn deposit(&self, addr: &Address, amount: u64) {
        let mut balances = self.balances.lock().unwrap();
        *balances.entry(*addr).or_insert(0) += amount;
    }

    /// Current balance of an address.
    pub fn balance(&self, addr: &Address) -> u64 {
        let balances = self.balances.lock().unwrap();
        balances.get(addr).copied().unwrap_or(0)
    }
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueTransfer for MemoryBank {
    fn transfer_split(
        &self,
        from: &Address,
        recipients: &[(Address, u64)],
    ) -> Result<(), EconomyError> {
        let mut balances = self.balances.lock().unwrap();

        let total: u64 = recipients.iter().map(|(_, amount)| amount).sum();
        let have = balances.get(from).copied().unwrap_or(0);
        if have < total {
            return Err(EconomyError::InsufficientFunds { have, need: total });
        }

        *balances.entry(*from).or_insert(0) -= total;
        for (to, amount) in recipients {
            if *amount > 0 {
                *balances.entry(*to).or_insert(0) += amount;
            }
        }
        Ok(())
    }
}

//! Flat integer currency balance.

use no_room_core::PlacementError;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Wallet {
    balance: u32,
}

impl Wallet {
    pub(crate) const fn new(balance: u32) -> Self {
        Self { balance }
    }

    pub(crate) const fn balance(&self) -> u32 {
        self.balance
    }

    /// Deducts the price, leaving the balance untouched when it does not cover it.
    pub(crate) fn charge(&mut self, price: u32) -> Result<(), PlacementError> {
        match self.balance.checked_sub(price) {
            Some(remaining) => {
                self.balance = remaining;
                Ok(())
            }
            None => Err(PlacementError::InsufficientFunds {
                price,
                balance: self.balance,
            }),
        }
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}

//! Agent types: firms, households, banks, the central bank and government.
//!
//! Populations are stored as flat, insertion-ordered `Vec`s owned by
//! [`crate::scheduler::Simulation`]; agents refer to each other by index
//! rather than by shared pointers, so ids below are newtypes over `usize`.

pub mod bank;
pub mod central_bank;
pub mod firm;
pub mod government;
pub mod household;

pub use bank::Bank;
pub use central_bank::CentralBank;
pub use firm::Firm;
pub use government::Government;
pub use household::Household;

/// Index of a [`Firm`] within a simulation's firm population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmId(pub usize);

/// Index of a [`Household`] within a simulation's household population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HouseholdId(pub usize);

/// Index of a [`Bank`] within a simulation's bank population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BankId(pub usize);

impl From<usize> for FirmId {
    fn from(i: usize) -> Self {
        FirmId(i)
    }
}

impl From<usize> for HouseholdId {
    fn from(i: usize) -> Self {
        HouseholdId(i)
    }
}

impl From<usize> for BankId {
    fn from(i: usize) -> Self {
        BankId(i)
    }
}

impl std::fmt::Display for FirmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "firm#{}", self.0)
    }
}

impl std::fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "household#{}", self.0)
    }
}

impl std::fmt::Display for BankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bank#{}", self.0)
    }
}

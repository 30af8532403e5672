pub mod ledger;
pub mod market;
pub mod negotiation;
pub mod policy;
pub mod processor;
pub mod sweeper;
pub mod valuation;

pub use ledger::*;
pub use market::*;
pub use negotiation::*;
pub use policy::*;
pub use processor::*;
pub use sweeper::*;
pub use valuation::*;

//! Repository implementations

mod completion;
mod payment;
mod profile;
mod report;
mod task;
mod withdrawal;

pub use completion::CompletionRepo;
pub use payment::PaymentRepo;
pub use profile::ProfileRepo;
pub use report::ReportRepo;
pub use task::TaskRepo;
pub use withdrawal::WithdrawalRepo;

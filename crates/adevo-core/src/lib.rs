pub mod dispute;
pub mod error;
pub mod identity;
pub mod money;
pub mod score;

pub use dispute::{BankName, DisputeDetails, DisputeStatus, Evidence, KnownBank};
pub use error::ValidationError;
pub use identity::{Bvn, IdentityRecord, LinkedAccount, mask_account_number};
pub use money::format_amount;
pub use score::{ScoreBand, ScoreResult, compute_score};

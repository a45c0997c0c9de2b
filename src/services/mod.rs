//! Business Logic Services
//!
//! File-backed stores for accounts, images, question banks, answers and
//! vignettes, plus the cross-answer search.

pub mod accounts;
pub mod images;
pub mod question_banks;
pub mod responses;
pub mod search;
pub mod vignettes;

pub use accounts::AccountStore;
pub use images::ImageStore;
pub use question_banks::QuestionBankStore;
pub use responses::ResponseStore;
pub use search::{search_all_answers, SearchHit};
pub use vignettes::VignetteStore;

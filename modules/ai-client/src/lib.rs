pub mod claude;
pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use claude::Claude;
pub use error::{AiError, Result};
pub use gemini::Gemini;
pub use traits::Completion;
pub use util::strip_code_blocks;

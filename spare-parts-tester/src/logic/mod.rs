pub mod assets;
pub mod host;
pub mod reports;
pub mod tester;

pub use assets::TesterAssets;
pub use tester::*;

pub mod contest;
pub mod source;
pub mod suite_xml;

pub use contest::*;
pub use source::*;
pub use suite_xml::{SuiteError, SUITE_FILE_EXT};

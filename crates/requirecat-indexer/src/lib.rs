//! Directory scanning and `require` statement extraction

pub mod config;
pub mod parser;
pub mod scanner;


pub use config::{ConfigError, ScanConfig, DEFAULT_OUTPUT, validate_output_path};
pub use parser::{ParseError, is_require_statement, parse_require_statement};
pub use scanner::{ScanError, ScanReport, ScanWarning, Scanner, WarningKind};

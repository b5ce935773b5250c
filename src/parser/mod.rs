pub mod controller_parser;
pub mod type_parser;

pub use controller_parser::{parse_all, ControllerParser};
pub use type_parser::parse_type;

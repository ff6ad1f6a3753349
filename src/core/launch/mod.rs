pub mod arguments;

pub use arguments::{format_argument, format_arguments, substitute, Argument, ArgumentValue};

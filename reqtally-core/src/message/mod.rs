mod parser;
mod trace_id;


pub use parser::*;
pub use trace_id::*;

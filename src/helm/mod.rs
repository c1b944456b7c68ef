pub mod command;
pub mod model;
pub mod parser;
#[cfg(test)]
pub mod stubs;

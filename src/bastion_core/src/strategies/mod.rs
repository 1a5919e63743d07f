pub mod code_generator;
pub mod code_processor;

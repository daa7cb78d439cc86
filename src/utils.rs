pub mod token;
pub mod prompt_processing;

pub mod rest;
pub mod token_file;

pub use rest::{RestClient, RestCollection};
pub use token_file::FileTokenStore;

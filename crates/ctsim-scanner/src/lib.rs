//! Scanner geometry setup and projection collection.

mod scanner;

pub use scanner::Scanner;

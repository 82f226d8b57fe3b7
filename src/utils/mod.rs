pub mod paths;

pub use paths::relative_to_root;

pub mod manuscript_file;

pub use manuscript_file::ManuscriptFile;

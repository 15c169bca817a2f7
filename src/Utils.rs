pub mod grid_viewer;
pub mod load_from_file;
pub mod logger;

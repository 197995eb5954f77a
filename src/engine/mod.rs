pub mod loaders;
pub mod rendering;
pub mod utils;

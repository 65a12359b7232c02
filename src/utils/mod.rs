pub mod time;

pub use time::dated_filename;

mod app;

pub mod dom;
pub mod pad;
pub mod rows;

pub use app::run;

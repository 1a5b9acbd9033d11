mod hello;
mod index;

pub use hello::HelloController;
pub use index::IndexController;

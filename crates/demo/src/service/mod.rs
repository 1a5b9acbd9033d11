mod hello;

pub use hello::HelloService;

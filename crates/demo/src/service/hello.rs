use trellis_core::prelude::*;

#[derive(Debug, Default, Service)]
pub struct HelloService;

impl HelloService {
    #[must_use]
    pub const fn age(&self) -> u32 {
        42
    }
}

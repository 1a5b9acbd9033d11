use trellis_core::prelude::*;

#[derive(Debug, Default, Service)]
pub struct GreetingService {
    #[autowired]
    audit: String,
}

fn main() {}

use trellis_core::prelude::*;

#[derive(Service)]
pub struct Cache<T> {
    entry: Option<T>,
}

fn main() {}

use trellis_core::prelude::*;

#[derive(Controller)]
pub enum Mode {
    On,
}

fn main() {}

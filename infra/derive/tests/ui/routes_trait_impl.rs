use trellis_derive::routes;

pub struct Plain;

#[routes]
impl Default for Plain {
    fn default() -> Self {
        Self
    }
}

fn main() {}

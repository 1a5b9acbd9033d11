use trellis_derive::routes;

pub struct Counter;

#[routes]
impl Counter {
    #[request_mapping("/bump")]
    pub fn bump(&mut self) {}
}

fn main() {}

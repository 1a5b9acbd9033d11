use trellis_core::prelude::*;

#[derive(Debug, Default, Controller)]
pub struct IndexController;

#[routes]
impl IndexController {
    #[request_mapping("/")]
    pub fn index(&self, _request: &RequestView, response: &mut dyn ResponseWriter) {
        response.write("hello world");
    }
}

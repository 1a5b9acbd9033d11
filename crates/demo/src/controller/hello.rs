use crate::service::HelloService;
use anyhow::Context;
use trellis_core::prelude::*;

#[derive(Debug, Default, Controller)]
#[request_mapping(path = "/hello")]
pub struct HelloController {
    #[autowired]
    hello_service: Autowired<HelloService>,
}

#[routes]
impl HelloController {
    /// Greets `name`; a missing name greets nobody.
    #[request_mapping(path = "/world")]
    pub fn hello_world(
        &self,
        _request: &RequestView,
        response: &mut dyn ResponseWriter,
        #[request_param(value = "name")] name: Option<String>,
    ) {
        response.write(&format!("Hello,{}", name.unwrap_or_default()));
    }

    #[request_mapping(path = "/age")]
    pub fn age(&self, _request: &RequestView, response: &mut dyn ResponseWriter) -> anyhow::Result<()> {
        let service = self.hello_service.get().context("helloService is not wired")?;
        response.write(&format!("Age is {}", service.age()));
        Ok(())
    }
}

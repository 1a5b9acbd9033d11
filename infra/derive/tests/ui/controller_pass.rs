use trellis_core::prelude::*;
use trellis_core::{Component, Handler, Marker, ParamKind};

#[derive(Debug, Default, Service)]
pub struct ClockService;

#[derive(Debug, Default, Controller)]
#[request_mapping(path = "/clock")]
pub struct ClockController {
    #[autowired]
    clock: Autowired<ClockService>,
    #[autowired(name = "backupClock")]
    backup: Autowired<crate::ClockService>,
}

#[routes]
impl ClockController {
    #[request_mapping("/now")]
    pub fn now(
        &self,
        request: &RequestView,
        response: &mut dyn ResponseWriter,
        #[request_param("zone")] zone: Option<String>,
        #[request_param(value = "offset")] offset: i32,
    ) -> Result<(), std::io::Error> {
        response.write(&format!("{} {} {}", request.path(), zone.unwrap_or_default(), offset));
        Ok(())
    }

    #[request_mapping = "/tick"]
    pub fn tick(&self, response: &mut dyn ResponseWriter) {
        response.write(if self.clock.get().is_some() { "tick" } else { "unwired" });
    }

    #[request_mapping("/private")]
    #[allow(dead_code)]
    fn private(&self) {}

    pub fn helper(&self) -> bool {
        self.backup.is_assigned()
    }
}

fn main() {
    let descriptor = <ClockController as Component>::descriptor();
    assert_eq!(descriptor.simple_name, "ClockController");
    assert!(descriptor.type_name.ends_with("::ClockController"));
    assert_eq!(descriptor.marker, Marker::Controller);
    assert_eq!(descriptor.base_path, Some("/clock"));
    assert_eq!(descriptor.injections.len(), 2);
    assert_eq!(descriptor.injections[0].type_name, "ClockService");
    assert_eq!(descriptor.injections[1].name, "backupClock");

    let controller = ClockController::default();
    let methods = controller.methods();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].name, "now");
    assert_eq!(methods[0].path, "/now");
    let kinds: Vec<_> = methods[0].params.iter().map(|param| param.kind).collect();
    assert_eq!(kinds, [ParamKind::Request, ParamKind::Response, ParamKind::Value, ParamKind::Value]);
    assert_eq!(methods[0].params[3].name, Some("offset"));
    assert_eq!(methods[1].path, "/tick");
    assert!(!controller.helper());
}

use std::sync::Arc;
use trellis_core::prelude::*;
use trellis_core::{Component, Marker};

#[derive(Debug, Default, Service)]
#[service("greeter")]
pub struct GreetingService {
    #[autowired]
    audit: Autowired<AuditService>,
}

#[derive(Debug, Default, Service)]
pub struct AuditService;

fn main() {
    let descriptor = <GreetingService as Component>::descriptor();
    assert_eq!(descriptor.marker, Marker::Service { name: "greeter" });
    assert_eq!(descriptor.key(), "greeter");
    assert_eq!(descriptor.base_path, None);
    assert_eq!(<AuditService as Component>::descriptor().key(), "auditService");

    let service = Arc::new(GreetingService::default());
    let audit: Arc<dyn Component> = Arc::new(AuditService);
    service.inject("audit", audit.clone().into_any()).unwrap();
    assert!(service.audit.get().is_some());
    assert!(service.inject("missing", audit.into_any()).is_err());
    assert!(Arc::clone(&service).into_handler().is_none());
}

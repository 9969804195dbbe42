use std::io::Read;

use crate::ident::registry::ServiceRegistry;
use crate::router::dispatch::EventRouter;
use crate::service::service_model::{ScreenService, ServiceContext};
use crate::trace::logger::TraceLogger;
use crate::wire::serialize::to_wire;
use crate::wire::wire_model::{EventRequest, EventResponse};

// ============================================================================
// render subcommand
// ============================================================================

pub fn cmd_render(
    registry: &ServiceRegistry,
    context: &str,
    scope: u8,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = registry
        .instantiate(context)
        .ok_or_else(|| format!("unknown context '{}'", context))?;

    if verbose > 0 {
        eprintln!("rendering '{}' at scope {}", context, scope);
    }

    let ctx = ServiceContext::new(registry, scope);
    let tree = service.build_ui(&ctx)?;
    let wire = to_wire(&tree)?;

    println!("{}", serde_json::to_string_pretty(&wire)?);
    Ok(())
}

// ============================================================================
// dispatch subcommand
// ============================================================================

/// Runs one event through the router. Returns false when the response was
/// an error, so the caller can set the exit code.
pub fn cmd_dispatch(
    registry: &ServiceRegistry,
    dev_mode: bool,
    trace_path: Option<&str>,
    file: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let request: EventRequest = serde_json::from_str(&raw)?;

    if verbose > 0 {
        eprintln!(
            "dispatching action '{}' for component {}",
            request.action, request.component_id
        );
    }

    let tracer = trace_path.map(TraceLogger::new);
    let mut router = EventRouter::new(registry).with_dev_mode(dev_mode);
    if let Some(tracer) = &tracer {
        router = router.with_tracer(tracer);
    }

    let response = router.dispatch(&request);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(!matches!(response, EventResponse::Error(_)))
}

// ============================================================================
// contexts subcommand
// ============================================================================

pub fn cmd_contexts(registry: &ServiceRegistry) {
    println!("{} registered contexts", registry.len());
    for (index, name) in registry.contexts() {
        println!("{:>5}  {}", index, name);
    }
}

use serde_json::Value;

use crate::element::element_model::ElementId;
use crate::wire::wire_model::EventParams;

/// Parameter carrying the identifier of the service that opened a dialog.
/// When present it wins over `component_id` for routing, and is stripped
/// before the service sees the parameters.
pub const CALLER_PARAM: &str = "_caller_service_id";

const METHOD_PREFIX: &str = "on";

/// Translates an action token into its method name: each underscore
/// separated word upper-cased, `on` prefixed. `submit_form` becomes
/// `onSubmitForm`, `a_b_c` becomes `onABC`.
pub fn method_name(action: &str) -> String {
    let mut name = String::from(METHOD_PREFIX);
    for word in action.split('_').filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Caller reference from the raw parameters, if the event came out of a
/// dialog owned by another service.
pub fn caller_reference(parameters: &EventParams) -> Option<ElementId> {
    parameters.get(CALLER_PARAM).and_then(Value::as_u64)
}

/// Drops routing-internal keys (underscore-prefixed) before dispatching
/// to the service.
pub fn strip_internal_params(parameters: &EventParams) -> EventParams {
    parameters
        .iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

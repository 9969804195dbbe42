use crate::element::element_model::ElementId;
use crate::error::ProtocolError;

// Bit layout, most significant first: 16-bit context index, 8-bit instance
// scope, 24-bit ordinal. 48 bits total, so every ID survives a JSON round
// trip through a double-precision client.
pub const CONTEXT_BITS: u32 = 16;
pub const SCOPE_BITS: u32 = 8;
pub const ORDINAL_BITS: u32 = 24;

const SCOPE_SHIFT: u32 = ORDINAL_BITS;
const CONTEXT_SHIFT: u32 = ORDINAL_BITS + SCOPE_BITS;

pub const MAX_ORDINAL: u32 = (1 << ORDINAL_BITS) - 1;
const RAW_MASK: u64 = (1 << (CONTEXT_SHIFT + CONTEXT_BITS)) - 1;

/// Decoded form of an element identifier: which logical service produced
/// it, which instance of that service, and where in the instance's
/// allocation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId {
    /// Index into the process-wide context registry
    pub context: u16,

    /// Disambiguates concurrent instances of one service, e.g. stacked
    /// dialogs
    pub scope: u8,

    /// Position within the instance's allocation sequence
    pub ordinal: u32,
}

/// Packs the triple into an opaque ID. Deterministic: identical inputs
/// always produce the identical value.
pub fn pack(id: ServiceId) -> Result<ElementId, ProtocolError> {
    if id.ordinal > MAX_ORDINAL {
        return Err(ProtocolError::FieldRange {
            field: "ordinal",
            value: u64::from(id.ordinal),
            max: u64::from(MAX_ORDINAL),
        });
    }

    Ok((u64::from(id.context) << CONTEXT_SHIFT)
        | (u64::from(id.scope) << SCOPE_SHIFT)
        | u64::from(id.ordinal))
}

/// Pure arithmetic unpacking; needs no state beyond the value itself.
/// Whether the context index names a registered service is the registry's
/// question, not the codec's.
pub fn unpack(raw: ElementId) -> Result<ServiceId, ProtocolError> {
    if raw & !RAW_MASK != 0 {
        return Err(ProtocolError::FieldRange {
            field: "identifier",
            value: raw,
            max: RAW_MASK,
        });
    }

    Ok(ServiceId {
        context: (raw >> CONTEXT_SHIFT) as u16,
        scope: ((raw >> SCOPE_SHIFT) & 0xff) as u8,
        ordinal: (raw & u64::from(MAX_ORDINAL)) as u32,
    })
}

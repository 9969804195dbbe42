mod common;

use common::{COUNTER, DIALOG, OPENER, id_for, test_registry};
use screenwire::error::{ErrorKind, ProtocolError};
use screenwire::ident::codec::{MAX_ORDINAL, ServiceId, pack, unpack};

// =========================================================================
// pack/unpack round trips
// =========================================================================

#[test]
fn codec_round_trips() {
    let cases = [
        ServiceId {
            context: 0,
            scope: 0,
            ordinal: 0,
        },
        ServiceId {
            context: 3,
            scope: 1,
            ordinal: 42,
        },
        ServiceId {
            context: u16::MAX,
            scope: u8::MAX,
            ordinal: MAX_ORDINAL,
        },
    ];

    for case in cases {
        let raw = pack(case).expect("packs");
        let back = unpack(raw).expect("unpacks");
        assert_eq!(back, case, "decode(encode(x)) == x for {:?}", case);
    }
}

#[test]
fn pack_is_deterministic() {
    let sid = ServiceId {
        context: 7,
        scope: 2,
        ordinal: 13,
    };
    assert_eq!(pack(sid).unwrap(), pack(sid).unwrap());
}

#[test]
fn component_ranges_are_disjoint() {
    // Each component lands in its own bit range; neighbours never bleed.
    let low = pack(ServiceId {
        context: 0,
        scope: 0,
        ordinal: MAX_ORDINAL,
    })
    .unwrap();
    let next_scope = pack(ServiceId {
        context: 0,
        scope: 1,
        ordinal: 0,
    })
    .unwrap();
    assert_eq!(low + 1, next_scope);

    let top_scope = pack(ServiceId {
        context: 0,
        scope: u8::MAX,
        ordinal: MAX_ORDINAL,
    })
    .unwrap();
    let next_context = pack(ServiceId {
        context: 1,
        scope: 0,
        ordinal: 0,
    })
    .unwrap();
    assert_eq!(top_scope + 1, next_context);
}

// =========================================================================
// range errors
// =========================================================================

#[test]
fn pack_rejects_oversized_ordinal() {
    let err = pack(ServiceId {
        context: 0,
        scope: 0,
        ordinal: MAX_ORDINAL + 1,
    })
    .unwrap_err();

    assert!(matches!(err, ProtocolError::FieldRange { field: "ordinal", .. }));
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn unpack_rejects_high_bits() {
    let err = unpack(1u64 << 48).unwrap_err();
    assert!(matches!(err, ProtocolError::FieldRange { .. }));
}

// =========================================================================
// registry resolution
// =========================================================================

#[test]
fn registry_resolves_known_contexts() {
    let registry = test_registry();

    let id = id_for(&registry, DIALOG, 4, 9);
    let (name, sid) = registry.resolve(id).expect("resolves");

    assert_eq!(name, DIALOG);
    assert_eq!(sid.scope, 4);
    assert_eq!(sid.ordinal, 9);
}

#[test]
fn registry_rejects_unknown_context_index() {
    let registry = test_registry();

    // Far beyond the four registered contexts.
    let raw = pack(ServiceId {
        context: 500,
        scope: 0,
        ordinal: 0,
    })
    .unwrap();
    let err = registry.resolve(raw).unwrap_err();

    assert!(matches!(err, ProtocolError::UnknownContext { index: 500 }));
    assert_eq!(err.kind(), ErrorKind::Routing, "routing class, never fatal");
    assert_eq!(err.status(), 404);
}

#[test]
fn registry_indexes_follow_registration_order() {
    let registry = test_registry();
    assert_eq!(registry.context_index(OPENER), Some(0));
    assert_eq!(registry.context_index(DIALOG), Some(1));
    assert_eq!(registry.context_index(COUNTER), Some(2));
    assert_eq!(registry.context_name(1), Some(DIALOG));
    assert_eq!(registry.context_name(200), None);
}

//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Evolvability-aware TLV dispatcher.
//!
//! [`EvDecoder`] walks the sub-TLVs of a TLV-VALUE and, for each one,
//! calls the first registered [`ElementDef`] whose type matches. Handlers
//! are registered with a declared order (by default the order they were
//! passed in, counted in steps of 100 so callers can interleave extra
//! elements without renumbering everything) and a repeatability flag.
//! TLV-TYPEs with no matching handler are either silently ignored (if
//! non-critical, per the NDN Packet Format v0.3 evolvability guidelines)
//! or treated as a decode failure.

use crate::decoder::{Decoder, Tlv};
use crate::error::DecodeError;

/// The default criticality test: a TLV-TYPE is critical (i.e. an unknown
/// instance of it is a hard decode error) if it is at most 31 or odd.
pub fn is_critical_default(tlv_type: u32) -> bool {
    tlv_type <= 31 || tlv_type % 2 == 1
}

/// A single registered element handler.
pub struct ElementDef<'f, 'b> {
    tlv_type: u32,
    repeatable: bool,
    /// `None` means "use the registration position".
    order: Option<u32>,
    handler: Box<dyn FnMut(&Tlv<'b>) -> bool + 'f>,
}

impl<'f, 'b> ElementDef<'f, 'b> {
    /// Registers a handler for `tlv_type` that always succeeds.
    pub fn new(tlv_type: u32, mut f: impl FnMut(&Tlv<'b>) + 'f) -> Self {
        ElementDef {
            tlv_type,
            repeatable: false,
            order: None,
            handler: Box::new(move |d| {
                f(d);
                true
            }),
        }
    }

    /// Registers a handler for `tlv_type` that may reject the element.
    pub fn fallible(tlv_type: u32, f: impl FnMut(&Tlv<'b>) -> bool + 'f) -> Self {
        ElementDef {
            tlv_type,
            repeatable: false,
            order: None,
            handler: Box::new(f),
        }
    }

    /// Registers a handler that just discards the element (used for
    /// fields that are recognized but not modeled).
    pub fn ignore(tlv_type: u32) -> Self {
        ElementDef {
            tlv_type,
            repeatable: false,
            order: None,
            handler: Box::new(|_| true),
        }
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

const AUTO_ORDER_STEP: u32 = 100;

/// Decodes `input`'s TLV-VALUE against `defs`, optionally restricting the
/// outer TLV-TYPE to one of `top_types` (pass an empty slice to accept
/// any type).
pub fn decode<'b>(
    input: &Tlv<'b>,
    top_types: &[u32],
    defs: Vec<ElementDef<'_, 'b>>,
) -> Result<(), DecodeError> {
    if !top_types.is_empty() && !top_types.contains(&input.tlv_type) {
        return Err(DecodeError::UnexpectedTopType(input.tlv_type));
    }
    decode_value(input.decoder(), defs)
}

/// Decodes a TLV-VALUE (already split into sub-elements by `input`)
/// against `defs`, using the default criticality rule and rejecting any
/// unrecognized critical TLV.
pub fn decode_value<'b>(
    input: Decoder<'b>,
    mut defs: Vec<ElementDef<'_, 'b>>,
) -> Result<(), DecodeError> {
    decode_value_ex(input, defs.as_mut_slice(), is_critical_default, |_d| false)
}

/// Full-control variant of [`decode_value`]: `is_critical` determines
/// whether an unrecognized TLV-TYPE is a hard error, and `unknown_cb` (if
/// it returns `true`) lets the caller consume an unrecognized TLV without
/// triggering that error regardless of criticality.
pub fn decode_value_ex<'b>(
    mut input: Decoder<'b>,
    defs: &mut [ElementDef<'_, 'b>],
    is_critical: impl Fn(u32) -> bool,
    mut unknown_cb: impl FnMut(&Tlv<'b>) -> bool,
) -> Result<(), DecodeError> {
    let mut current_order: u32 = 0;
    let mut seen_at_order: Option<u32> = None;

    while let Some(tlv) = input.next() {
        let mut matched = false;
        for (i, def) in defs.iter_mut().enumerate() {
            if def.tlv_type != tlv.tlv_type {
                continue;
            }
            matched = true;
            let def_order = def.order.unwrap_or(i as u32 * AUTO_ORDER_STEP);
            if current_order > def_order {
                return handle_unrecognized(&tlv, &is_critical, &mut unknown_cb);
            }
            if current_order == def_order && seen_at_order == Some(def_order) && !def.repeatable {
                return Err(DecodeError::OutOfOrder(tlv.tlv_type));
            }
            if !(def.handler)(&tlv) {
                return Err(DecodeError::OutOfOrder(tlv.tlv_type));
            }
            current_order = def_order;
            seen_at_order = Some(def_order);
            break;
        }
        if !matched {
            handle_unrecognized(&tlv, &is_critical, &mut unknown_cb)?;
        }
    }

    // The underlying iterator stops yielding (rather than panicking) on
    // malformed input; surface that as a decode error here.
    if let Some(err) = input.error() {
        return Err(err.clone());
    }
    Ok(())
}

fn handle_unrecognized<'b>(
    tlv: &Tlv<'b>,
    is_critical: &impl Fn(u32) -> bool,
    unknown_cb: &mut impl FnMut(&Tlv<'b>) -> bool,
) -> Result<(), DecodeError> {
    if unknown_cb(tlv) || !is_critical(tlv.tlv_type) {
        Ok(())
    } else {
        Err(DecodeError::Critical(tlv.tlv_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_in_order() {
        // 08 01 41 (type 8) then 09 01 42 (type 9, non-critical: even, >31? no -- 9 is odd so critical)
        // use even types above 31 to keep them non-critical by default rule.
        let input = [0x28, 0x01, 0x41, 0x2A, 0x01, 0x42];
        let (tlv, _) = Tlv::read(&[&[0x30, input.len() as u8][..], &input[..]].concat()).unwrap();

        let mut a = None;
        let mut b = None;
        let defs = vec![
            ElementDef::new(0x28, |d| a = Some(d.value[0])),
            ElementDef::new(0x2A, |d| b = Some(d.value[0])),
        ];
        decode(&tlv, &[0x30], defs).unwrap();
        assert_eq!(a, Some(0x41));
        assert_eq!(b, Some(0x42));
    }

    #[test]
    fn out_of_order_element_is_rejected() {
        let input = [0x2A, 0x01, 0x42, 0x28, 0x01, 0x41];
        let (tlv, _) = Tlv::read(&[&[0x30, input.len() as u8][..], &input[..]].concat()).unwrap();

        let defs = vec![ElementDef::new(0x28, |_| {}), ElementDef::new(0x2A, |_| {})];
        let err = decode(&tlv, &[0x30], defs).unwrap_err();
        assert_eq!(err, DecodeError::Critical(0x28));
    }

    #[test]
    fn unknown_critical_type_is_rejected() {
        let input = [0x09, 0x01, 0x00]; // type 9 is odd => critical
        let (tlv, _) = Tlv::read(&[&[0x30, input.len() as u8][..], &input[..]].concat()).unwrap();
        let err = decode(&tlv, &[0x30], vec![]).unwrap_err();
        assert_eq!(err, DecodeError::Critical(9));
    }

    #[test]
    fn unknown_non_critical_type_is_ignored() {
        let input = [0x28, 0x01, 0x00]; // 40, even, >31 => non-critical
        let (tlv, _) = Tlv::read(&[&[0x30, input.len() as u8][..], &input[..]].concat()).unwrap();
        decode(&tlv, &[0x30], vec![]).unwrap();
    }

    #[test]
    fn non_repeatable_duplicate_is_rejected() {
        let input = [0x28, 0x01, 0x01, 0x28, 0x01, 0x02];
        let (tlv, _) = Tlv::read(&[&[0x30, input.len() as u8][..], &input[..]].concat()).unwrap();
        let defs = vec![ElementDef::new(0x28, |_| {})];
        let err = decode(&tlv, &[0x30], defs).unwrap_err();
        assert_eq!(err, DecodeError::OutOfOrder(0x28));
    }
}

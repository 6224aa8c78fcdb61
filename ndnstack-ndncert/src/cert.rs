//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Certificate Data packets: `<subject>/KEY/<keyId>/<issuer>/<version>`
//! names carrying a SubjectPublicKeyInfo as Content, self-signed or
//! signed by a CA key, with a `ValidityPeriod` in the signature info.

use ndnstack_keys::EcdsaPublicKey;
use ndnstack_packet::{Data, Name, Signer};
use ndnstack_region::Region;

use crate::an;

/// Builds a certificate name `<subject>/KEY/<keyId>/<issuer>/<version>`.
pub fn build_name<'b>(
    region: &'b Region<'b>,
    subject: Name<'b>,
    key_id: &[u8],
    issuer: &[u8],
    version: u64,
) -> Option<Name<'b>> {
    let key_comp = ndnstack_packet::Component::generic(region, an::KEY_COMPONENT)?;
    let key_id_comp = ndnstack_packet::Component::generic(region, key_id)?;
    let issuer_comp = ndnstack_packet::Component::generic(region, issuer)?;
    let version_comp = ndnstack_packet::convention::build_version(region, version)?;
    subject.append(region, &[key_comp, key_id_comp, issuer_comp, version_comp])
}

/// True if `name` has the `.../KEY/<keyId>/<issuer>/<version>` suffix a
/// certificate name requires.
pub fn is_cert_name(name: &Name<'_>) -> bool {
    if name.len() < 4 {
        return false;
    }
    let Some(key_comp) = name.get(-4) else {
        return false;
    };
    key_comp.is_generic() && key_comp.value() == an::KEY_COMPONENT
}

/// Builds and signs a certificate Data packet for `subject_public_key`,
/// valid over `(not_before, not_after)`.
pub fn build<'b>(
    region: &'b Region<'b>,
    subject: Name<'b>,
    key_id: &[u8],
    issuer: &[u8],
    version: u64,
    subject_public_key: &EcdsaPublicKey,
    validity_period: (u64, u64),
    signer: &dyn Signer,
) -> Option<&'b [u8]> {
    let name = build_name(region, subject, key_id, issuer, version)?;
    let spki = subject_public_key.to_public_key_der()?;
    let content = region.alloc(spki.len())?;
    content.copy_from_slice(&spki);

    let mut data = Data::new(name);
    data.content_type = ndnstack_packet::an::content_type::KEY;
    data.content = content;
    data.encode_signed_with_validity(region, signer, Some(validity_period))
}

/// Extracts the SubjectPublicKeyInfo from a decoded certificate Data
/// packet's content.
pub fn subject_public_key(data: &Data<'_>) -> Option<EcdsaPublicKey> {
    EcdsaPublicKey::from_public_key_der(data.content)
}

/// The `ValidityPeriod` recorded in a decoded certificate's signature
/// info, if any.
pub fn validity_period(data: &Data<'_>) -> Option<(u64, u64)> {
    data.sig_info?.validity_period
}

/// Whether `now` (Unix seconds) falls within the certificate's validity
/// period. A certificate with no recorded `ValidityPeriod` is never
/// considered valid.
pub fn is_valid_at(data: &Data<'_>, now: u64) -> bool {
    match validity_period(data) {
        Some((not_before, not_after)) => now >= not_before && now <= not_after,
        None => false,
    }
}

/// `MaxValidityPeriod` used when the requested period exceeds the CA
/// profile's bound, or when a challenge does not otherwise constrain it.
/// The reference implementation hard-codes the maximum representable
/// period here rather than consulting the profile on the issuance path;
/// kept as-is since fixing it is outside the issuance protocol proper.
pub fn max_validity_period(now: u64, max_validity_seconds: u64) -> (u64, u64) {
    (now, now.saturating_add(max_validity_seconds))
}

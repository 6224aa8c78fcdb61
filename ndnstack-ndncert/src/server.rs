//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Server-side NDNCERT session: CA profile construction and the
//! NEW/CHALLENGE state machine an issuer drives per requester.

use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use ndnstack_face::{FaceApi, PacketHandler};
use ndnstack_keys::{EcdsaPrivateKey, EcdsaPublicKey};
use ndnstack_packet::{Component, Data, Interest, Name, Verifier};
use ndnstack_region::Region;
use p256::ecdh::EphemeralSecret;
use p256::PublicKey as EcdhPublicKey;
use rand::RngCore;
use rand_core::OsRng;

use crate::an::{self, challenge_consts, tt, ErrorCode, Status};
use crate::common::{EncryptedFrame, Role, SessionKey};

/// A parameter key/value pair submitted with a CHALLENGE request.
#[derive(Clone, Debug)]
pub struct ChallengeParameter {
    pub key: String,
    pub value: Vec<u8>,
}

/// Outcome of one round of [`Challenge::process`].
pub enum ChallengeOutcome {
    Success,
    /// Not yet satisfied; `challenge_status` is echoed back as a prompt
    /// for what the requester should submit next.
    Continue { challenge_status: String },
    /// This round failed. `decrement_retry` mirrors the reference's
    /// per-challenge choice of which failures count against
    /// `RemainingTries` (a malformed request need not).
    Failure { decrement_retry: bool },
}

/// A server-side challenge implementation, instantiated fresh for each
/// session that selects it.
pub trait Challenge {
    fn id(&self) -> &'static str;
    fn time_limit(&self) -> Duration;
    fn retry_limit(&self) -> u32;
    fn process(&mut self, params: &[ChallengeParameter]) -> ChallengeOutcome;
}

/// Accepts unconditionally. For CAs that gate issuance on the Interest's
/// own signature alone; not for production use.
pub struct NopChallenge;

impl Challenge for NopChallenge {
    fn id(&self) -> &'static str {
        challenge_consts::NOP
    }
    fn time_limit(&self) -> Duration {
        Duration::from_millis(1000)
    }
    fn retry_limit(&self) -> u32 {
        1
    }
    fn process(&mut self, _params: &[ChallengeParameter]) -> ChallengeOutcome {
        ChallengeOutcome::Success
    }
}

/// Verifies possession of a previously issued certificate: the first
/// round records the public key from the presented certificate and asks
/// for a signature over a nonce; the second checks that signature.
///
/// The wire format has no field of its own for carrying the nonce back
/// to the requester (only `ChallengeStatus`, a bare string, comes back
/// on a CHALLENGE response) so, mirroring the client side, the nonce is
/// assumed to reach the requester out of band; `ChallengeStatus` only
/// signals which step is expected next.
#[derive(Default)]
pub struct PossessionChallenge {
    proven_key: Option<EcdsaPublicKey>,
    nonce: Option<[u8; 16]>,
}

impl PossessionChallenge {
    pub fn new() -> PossessionChallenge {
        PossessionChallenge::default()
    }
}

impl Challenge for PossessionChallenge {
    fn id(&self) -> &'static str {
        challenge_consts::POSSESSION
    }
    fn time_limit(&self) -> Duration {
        Duration::from_millis(60_000)
    }
    fn retry_limit(&self) -> u32 {
        3
    }
    fn process(&mut self, params: &[ChallengeParameter]) -> ChallengeOutcome {
        match self.nonce {
            Some(nonce) => {
                let Some(proof) = params.iter().find(|p| p.key == challenge_consts::PROOF) else {
                    return ChallengeOutcome::Failure {
                        decrement_retry: true,
                    };
                };
                let Some(key) = &self.proven_key else {
                    return ChallengeOutcome::Failure {
                        decrement_retry: true,
                    };
                };
                if key.verify(&[&nonce[..]], &proof.value) {
                    ChallengeOutcome::Success
                } else {
                    ChallengeOutcome::Failure {
                        decrement_retry: true,
                    }
                }
            }
            None => {
                let Some(cert_param) = params
                    .iter()
                    .find(|p| p.key == challenge_consts::ISSUED_CERT)
                else {
                    return ChallengeOutcome::Failure {
                        decrement_retry: true,
                    };
                };
                let Ok((tlv, _)) = ndnstack_tlv::Tlv::read(&cert_param.value) else {
                    return ChallengeOutcome::Failure {
                        decrement_retry: true,
                    };
                };
                let Ok(cert_data) = Data::decode(&tlv) else {
                    return ChallengeOutcome::Failure {
                        decrement_retry: true,
                    };
                };
                let Some(public_key) = crate::cert::subject_public_key(&cert_data) else {
                    return ChallengeOutcome::Failure {
                        decrement_retry: true,
                    };
                };
                if !cert_data.verify(&public_key) {
                    return ChallengeOutcome::Failure {
                        decrement_retry: true,
                    };
                }

                let mut nonce = [0u8; 16];
                rand::rng().fill_bytes(&mut nonce);
                self.nonce = Some(nonce);
                self.proven_key = Some(public_key);
                ChallengeOutcome::Continue {
                    challenge_status: challenge_consts::NONCE.to_string(),
                }
            }
        }
    }
}

/// Builds and signs the CA's own certificate: `<caPrefix>/KEY/<keyId>/
/// CA/<version>`, self-signed.
pub fn build_ca_certificate<'b>(
    region: &'b Region<'b>,
    ca_prefix: &[u8],
    ca_key: &EcdsaPrivateKey,
    validity_period: (u64, u64),
) -> Option<&'b [u8]> {
    let subject = Name::from_value(crate::common::copy_into(region, ca_prefix)?).ok()?;
    let key_id = b"ca-key";
    crate::cert::build(
        region,
        subject,
        key_id,
        an::CA_COMPONENT,
        1,
        &ca_key.public_key(),
        validity_period,
        ca_key,
    )
}

/// Builds and signs the CA profile Data (`CaPrefix || CaInfo ||
/// MaxValidityPeriod || CaCertificate`), carrying `ca_certificate` (a
/// wire-encoded, self-signed Data) so a requester can bootstrap trust
/// from the profile alone. Distributed out of band, as loaded by a
/// client from a profile file; not served over the network here.
pub fn build_profile<'b>(
    region: &'b Region<'b>,
    ca_prefix: &[u8],
    max_validity_period: u64,
    ca_certificate: &[u8],
    ca_key: &EcdsaPrivateKey,
) -> Option<&'b [u8]> {
    let content_region = region.sub_region(region.available() / 2)?;
    let mut content_enc = ndnstack_tlv::Encoder::new(&content_region)?;
    content_enc.prepend_tlv(tt::CA_CERTIFICATE, false, |e| {
        e.prepend_bytes(ca_certificate);
    });
    content_enc.prepend_tlv(tt::MAX_VALIDITY_PERIOD, false, |e| {
        ndnstack_tlv::nni::encode(e, max_validity_period)
    });
    content_enc.prepend_tlv(tt::CA_INFO, false, |e| {
        e.prepend_bytes(b"");
    });
    content_enc.prepend_tlv(tt::CA_PREFIX, false, |e| {
        e.prepend_bytes(ca_prefix);
    });
    if !content_enc.is_ok() {
        content_enc.discard();
        return None;
    }
    let content = content_enc.trim();
    let content_buf = region.alloc(content.len())?;
    content_buf.copy_from_slice(content);

    let prefix_name = Name::from_value(crate::common::copy_into(region, ca_prefix)?).ok()?;
    let ca_comp = Component::generic(region, an::CA_COMPONENT)?;
    let info_comp = Component::generic(region, an::INFO_COMPONENT)?;
    let name = prefix_name.append(region, &[ca_comp, info_comp])?;

    let mut data = Data::new(name);
    data.content = content_buf;
    data.encode_signed(region, ca_key)
}

/// One requester's progress through the NEW/CHALLENGE exchange.
struct Session {
    subject_public_key: EcdsaPublicKey,
    session_key: SessionKey,
    challenge: Option<Box<dyn Challenge>>,
    prev_challenge_id: Option<&'static str>,
    remaining_tries: u32,
    expire_at: Option<Instant>,
    status: Status,
    issued_cert: Option<Vec<u8>>,
    issued_cert_name: Option<Vec<u8>>,
}

impl Session {
    fn is_done(&self) -> bool {
        matches!(self.status, Status::Success | Status::Failure)
    }
}

/// Builds and signs the issued certificate for `subject_public_key`,
/// under a name derived from the CA prefix and the session's
/// `RequestId` (the NEW request carries no separate subject name).
/// `ValidityPeriod` uses the CA's own maximum, not the period the
/// requester asked for in its CertRequest.
fn issue_certificate<'b>(
    region: &'b Region<'b>,
    ca_prefix: &[u8],
    ca_key: &EcdsaPrivateKey,
    max_validity_period: u64,
    request_id: &[u8],
    subject_public_key: &EcdsaPublicKey,
) -> Option<(&'b [u8], Vec<u8>)> {
    let ca_prefix_name = Name::from_value(crate::common::copy_into(region, ca_prefix)?).ok()?;
    let requester_comp = Component::generic(region, b"requester")?;
    let id_comp = Component::generic(region, request_id)?;
    let subject = ca_prefix_name.append(region, &[requester_comp, id_comp])?;

    let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
    let validity = crate::cert::max_validity_period(now, max_validity_period);

    let mut key_id = [0u8; 8];
    rand::rng().fill_bytes(&mut key_id);

    let cert_wire = crate::cert::build(
        region,
        subject,
        &key_id,
        an::CA_COMPONENT,
        1,
        subject_public_key,
        validity,
        ca_key,
    )?;
    let (tlv, _) = ndnstack_tlv::Tlv::read(cert_wire).ok()?;
    let cert_data = Data::decode(&tlv).ok()?;
    Some((cert_wire, cert_data.name.value().to_vec()))
}

/// A [`PacketHandler`] that answers NEW and CHALLENGE Interests under
/// `ca_prefix` and serves each session's issued certificate afterward.
pub struct Server {
    ca_prefix: Vec<u8>,
    ca_key: EcdsaPrivateKey,
    max_validity_period: u64,
    challenges: Vec<(&'static str, fn() -> Box<dyn Challenge>)>,
    sessions: HashMap<Vec<u8>, Session>,
}

impl Server {
    pub fn new(ca_prefix: &[u8], ca_key: EcdsaPrivateKey, max_validity_period: u64) -> Server {
        Server {
            ca_prefix: ca_prefix.to_vec(),
            ca_key,
            max_validity_period,
            challenges: Vec::new(),
            sessions: HashMap::new(),
        }
    }

    /// Registers a challenge this CA offers to requesters. `factory`
    /// must not capture session state: it is called once per session
    /// that selects `id`.
    pub fn offer_challenge(&mut self, id: &'static str, factory: fn() -> Box<dyn Challenge>) {
        self.challenges.push((id, factory));
    }

    pub fn ca_public_key(&self) -> EcdsaPublicKey {
        self.ca_key.public_key()
    }

    fn make_error<'b>(&self, region: &'b Region<'b>, name: Name<'_>, code: ErrorCode) -> Option<&'b [u8]> {
        let name = Name::from_value(crate::common::copy_into(region, name.value())?).ok()?;
        let content_region = region.sub_region(region.available() / 4)?;
        let mut enc = ndnstack_tlv::Encoder::new(&content_region)?;
        enc.prepend_tlv(tt::ERROR_CODE, false, |e| {
            ndnstack_tlv::nni::encode(e, code.to_wire())
        });
        if !enc.is_ok() {
            enc.discard();
            return None;
        }
        let content = enc.trim();
        let content_buf = region.alloc(content.len())?;
        content_buf.copy_from_slice(content);

        let mut data = Data::new(name);
        data.content = content_buf;
        data.encode_signed(region, &self.ca_key)
    }

    fn handle_new<'b>(&mut self, region: &'b Region<'b>, interest: &Interest<'_>) -> Option<&'b [u8]> {
        let Some(app_params) = interest.app_parameters else {
            return self.make_error(region, interest.name, ErrorCode::BadInterestFormat);
        };

        let mut ecdh_pub: Option<Vec<u8>> = None;
        let mut cert_request: Option<Vec<u8>> = None;
        let decoded = ndnstack_tlv::ev_decoder::decode_value(
            ndnstack_tlv::Decoder::new(app_params),
            vec![
                ndnstack_tlv::ElementDef::new(tt::ECDH_PUB, |d| ecdh_pub = Some(d.value.to_vec()))
                    .with_order(100),
                ndnstack_tlv::ElementDef::new(tt::CERT_REQUEST, |d| {
                    cert_request = Some(d.value.to_vec())
                })
                .with_order(200),
            ],
        )
        .is_ok();
        let (Some(ecdh_pub), Some(cert_request)) = (ecdh_pub, cert_request) else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };
        if !decoded {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        }

        let Ok((cert_request_tlv, _)) = ndnstack_tlv::Tlv::read(&cert_request) else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };
        let Ok(cert_request_data) = Data::decode(&cert_request_tlv) else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };
        let Some(subject_public_key) = crate::cert::subject_public_key(&cert_request_data) else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };
        if !cert_request_data.verify(&subject_public_key) {
            return self.make_error(region, interest.name, ErrorCode::BadSignature);
        }
        if !interest.verify(&subject_public_key) {
            return self.make_error(region, interest.name, ErrorCode::BadSignature);
        }
        let Ok(peer_point) = EcdhPublicKey::from_sec1_bytes(&ecdh_pub) else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };

        let server_secret = EphemeralSecret::random(&mut OsRng);
        let server_pub_point = server_secret.public_key().to_sec1_bytes();
        let mut salt = [0u8; 32];
        rand::rng().fill_bytes(&mut salt);
        let mut request_id = [0u8; 8];
        rand::rng().fill_bytes(&mut request_id);

        let Some(session_key) = SessionKey::derive(
            &server_secret,
            &peer_point,
            &salt,
            &request_id,
            Role::Issuer,
        ) else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };

        self.sessions.insert(
            request_id.to_vec(),
            Session {
                subject_public_key,
                session_key,
                challenge: None,
                prev_challenge_id: None,
                remaining_tries: 0,
                expire_at: None,
                status: Status::BeforeChallenge,
                issued_cert: None,
                issued_cert_name: None,
            },
        );

        let content_region = region.sub_region(region.available() / 2)?;
        let mut content_enc = ndnstack_tlv::Encoder::new(&content_region)?;
        for (id, _) in self.challenges.iter().rev() {
            content_enc.prepend_tlv(tt::CHALLENGE, false, |e| {
                e.prepend_bytes(id.as_bytes());
            });
        }
        content_enc.prepend_tlv(tt::REQUEST_ID, false, |e| {
            e.prepend_bytes(&request_id);
        });
        content_enc.prepend_tlv(tt::SALT, false, |e| {
            e.prepend_bytes(&salt);
        });
        content_enc.prepend_tlv(tt::ECDH_PUB, false, |e| {
            e.prepend_bytes(&server_pub_point);
        });
        if !content_enc.is_ok() {
            content_enc.discard();
            return None;
        }
        let content = content_enc.trim();
        let content_buf = region.alloc(content.len())?;
        content_buf.copy_from_slice(content);

        let mut data = Data::new(interest.name);
        data.content = content_buf;
        data.encode_signed(region, &self.ca_key)
    }

    fn handle_challenge<'b>(
        &mut self,
        region: &'b Region<'b>,
        interest: &Interest<'_>,
        request_id: &[u8],
    ) -> Option<&'b [u8]> {
        let Some(session) = self.sessions.get_mut(request_id) else {
            return self.make_error(region, interest.name, ErrorCode::InvalidParameters);
        };
        if session.is_done() {
            return self.make_error(region, interest.name, ErrorCode::InvalidParameters);
        }
        if !interest.verify(&session.subject_public_key) {
            session.status = Status::Failure;
            return self.make_error(region, interest.name, ErrorCode::BadSignature);
        }
        let Some(app_params) = interest.app_parameters else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };
        let Ok(frame) = EncryptedFrame::decode(app_params) else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };
        let Some(plaintext) = session.session_key.decrypt(request_id, &frame) else {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        };

        let mut selected_challenge = String::new();
        let mut params: Vec<ChallengeParameter> = Vec::new();
        let mut pending_key: Option<String> = None;
        let decoded = ndnstack_tlv::ev_decoder::decode_value(
            ndnstack_tlv::Decoder::new(&plaintext),
            vec![
                ndnstack_tlv::ElementDef::new(tt::SELECTED_CHALLENGE, |d| {
                    selected_challenge = String::from_utf8_lossy(d.value).into_owned();
                })
                .with_order(100),
                ndnstack_tlv::ElementDef::new(tt::PARAMETER_KEY, |d| {
                    pending_key = Some(String::from_utf8_lossy(d.value).into_owned());
                })
                .repeatable()
                .with_order(200),
                ndnstack_tlv::ElementDef::new(tt::PARAMETER_VALUE, |d| {
                    if let Some(key) = pending_key.take() {
                        params.push(ChallengeParameter {
                            key,
                            value: d.value.to_vec(),
                        });
                    }
                })
                .repeatable()
                .with_order(200),
            ],
        )
        .is_ok();
        if !decoded {
            return self.make_error(region, interest.name, ErrorCode::BadParameterFormat);
        }

        match session.prev_challenge_id {
            None => {
                let Some((id, factory)) = self
                    .challenges
                    .iter()
                    .find(|(id, _)| *id == selected_challenge)
                else {
                    return self.make_error(region, interest.name, ErrorCode::InvalidParameters);
                };
                let challenge = factory();
                let session = self.sessions.get_mut(request_id)?;
                session.remaining_tries = challenge.retry_limit();
                session.expire_at = Some(Instant::now() + challenge.time_limit());
                session.prev_challenge_id = Some(id);
                session.challenge = Some(challenge);
            }
            Some(prev) if prev != selected_challenge => {
                let session = self.sessions.get_mut(request_id)?;
                session.status = Status::Failure;
                return self.make_error(region, interest.name, ErrorCode::OutOfTries);
            }
            Some(_) => {}
        }

        let session = self.sessions.get_mut(request_id)?;
        if session.remaining_tries == 0 {
            session.status = Status::Failure;
            return self.make_error(region, interest.name, ErrorCode::OutOfTries);
        }
        if session.expire_at.is_some_and(|t| Instant::now() >= t) {
            session.status = Status::Failure;
            return self.make_error(region, interest.name, ErrorCode::OutOfTime);
        }

        let outcome = session.challenge.as_mut()?.process(&params);
        let (status, challenge_status, issued_name) = match outcome {
            ChallengeOutcome::Success => {
                let subject_public_key = session.subject_public_key.clone();
                let Some((cert_wire, cert_name)) = issue_certificate(
                    region,
                    &self.ca_prefix,
                    &self.ca_key,
                    self.max_validity_period,
                    request_id,
                    &subject_public_key,
                ) else {
                    let session = self.sessions.get_mut(request_id)?;
                    session.status = Status::Failure;
                    return self.make_error(region, interest.name, ErrorCode::NoAvailableName);
                };
                let cert_wire = cert_wire.to_vec();
                let session = self.sessions.get_mut(request_id)?;
                session.issued_cert = Some(cert_wire);
                session.issued_cert_name = Some(cert_name.clone());
                session.status = Status::Success;
                (Status::Success, String::new(), Some(cert_name))
            }
            ChallengeOutcome::Continue { challenge_status } => {
                session.status = Status::Challenge;
                (Status::Challenge, challenge_status, None)
            }
            ChallengeOutcome::Failure { decrement_retry } => {
                if decrement_retry {
                    session.remaining_tries = session.remaining_tries.saturating_sub(1);
                }
                if session.remaining_tries == 0 {
                    session.status = Status::Failure;
                    return self.make_error(region, interest.name, ErrorCode::OutOfTries);
                }
                session.status = Status::Pending;
                (Status::Pending, String::new(), None)
            }
        };

        let session = self.sessions.get(request_id)?;
        let remaining_tries = session.remaining_tries as u64;
        let remaining_time_ms = session
            .expire_at
            .and_then(|t| t.checked_duration_since(Instant::now()))
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let plain_region = region.sub_region(region.available() / 2)?;
        let mut plain_enc = ndnstack_tlv::Encoder::new(&plain_region)?;
        if let Some(name) = &issued_name {
            plain_enc.prepend_tlv(tt::ISSUED_CERT_NAME, false, |e| {
                e.prepend_bytes(name);
            });
        }
        plain_enc.prepend_tlv(tt::REMAINING_TIME, false, |e| {
            ndnstack_tlv::nni::encode(e, remaining_time_ms)
        });
        plain_enc.prepend_tlv(tt::REMAINING_TRIES, false, |e| {
            ndnstack_tlv::nni::encode(e, remaining_tries)
        });
        plain_enc.prepend_tlv(tt::CHALLENGE_STATUS, false, |e| {
            e.prepend_bytes(challenge_status.as_bytes());
        });
        plain_enc.prepend_tlv(tt::STATUS, false, |e| {
            ndnstack_tlv::nni::encode(e, status.to_wire())
        });
        if !plain_enc.is_ok() {
            plain_enc.discard();
            return None;
        }
        let plaintext = plain_enc.trim();

        let session = self.sessions.get_mut(request_id)?;
        let frame = session.session_key.encrypt(request_id, plaintext)?;
        let app_params_enc_region = region.sub_region(region.available() / 2)?;
        let mut app_params_enc = ndnstack_tlv::Encoder::new(&app_params_enc_region)?;
        frame.encode_to(&mut app_params_enc);
        let app_params = app_params_enc.trim();
        let app_params_buf = region.alloc(app_params.len())?;
        app_params_buf.copy_from_slice(app_params);

        let mut data = Data::new(interest.name);
        data.content = app_params_buf;
        data.encode_signed(region, &self.ca_key)
    }

    fn serve_issued_certificate<'b>(
        &self,
        region: &'b Region<'b>,
        interest: &Interest<'_>,
    ) -> Option<&'b [u8]> {
        let cert_wire = self.sessions.values().find_map(|session| {
            let name = session.issued_cert_name.as_deref()?;
            if name == interest.name.value() {
                session.issued_cert.as_deref()
            } else {
                None
            }
        })?;
        let buf = region.alloc(cert_wire.len())?;
        buf.copy_from_slice(cert_wire);
        Some(buf)
    }
}

impl PacketHandler for Server {
    fn process_interest(&mut self, face: &dyn FaceApi, interest: &Interest<'_>) -> bool {
        let Ok(prefix_name) = Name::from_value(&self.ca_prefix) else {
            return false;
        };
        if !prefix_name.is_prefix_of(&interest.name) {
            return false;
        }
        let prefix_len = prefix_name.len() as i64;
        let Some(ca_comp) = interest.name.get(prefix_len) else {
            return false;
        };
        if !ca_comp.is_generic() || ca_comp.value() != an::CA_COMPONENT {
            return false;
        }
        let Some(op_comp) = interest.name.get(prefix_len + 1) else {
            return false;
        };

        let mut scratch = [0u8; 4096];
        let region = Region::new(&mut scratch);
        let reply = if op_comp.value() == an::NEW_COMPONENT {
            self.handle_new(&region, interest)
        } else if op_comp.value() == an::CHALLENGE_COMPONENT {
            let Some(request_id_comp) = interest.name.get(prefix_len + 2) else {
                return false;
            };
            self.handle_challenge(&region, interest, request_id_comp.value())
        } else {
            self.serve_issued_certificate(&region, interest)
        };

        match reply {
            Some(wire) => face.reply(&region, wire),
            None => false,
        }
    }

    fn loop_tick(&mut self, _face: &dyn FaceApi) {
        self.sessions.retain(|_, session| {
            !session.is_done() || session.issued_cert.is_some() || session.status == Status::Failure
        });
    }
}

//
// Copyright (c) The ndnstack Contributors
//
// SPDX-License-Identifier: MIT
//

//! Client-side NDNCERT session: the NEW/CHALLENGE state machine a
//! requester drives to turn an unsigned key pair into an issued
//! certificate.
//!
//! Unlike the reference implementation's callback-based `Challenge`
//! interface, challenges here return their next parameters directly:
//! both challenges this module ships (`nop`, `possession`) resolve
//! without any asynchronous I/O, so there is nothing a callback would
//! buy over a plain return value.

use std::time::{Duration, Instant};

use ndnstack_face::{FaceApi, PacketHandler};
use ndnstack_keys::{EcdsaPrivateKey, EcdsaPublicKey};
use ndnstack_packet::{Component, Data, Interest, Name};
use ndnstack_region::Region;
use p256::ecdh::EphemeralSecret;
use p256::PublicKey as EcdhPublicKey;
use rand_core::OsRng;

use crate::an::{self, challenge_consts, tt, Status};
use crate::common::{EncryptedFrame, Role, SessionKey};

/// Deadline applied to every step of the exchange: if the server does
/// not answer in time, the session fails locally.
pub const STEP_DEADLINE: Duration = Duration::from_millis(4000);

/// A parameter key/value pair submitted with a CHALLENGE request.
#[derive(Clone, Debug)]
pub struct ChallengeParameter {
    pub key: String,
    pub value: Vec<u8>,
}

/// A client-side challenge implementation.
pub trait Challenge {
    /// The challenge identifier string sent as `SelectedChallenge`.
    fn id(&self) -> &'static str;

    /// Parameters to submit with the first CHALLENGE request.
    fn start(&mut self) -> Vec<ChallengeParameter>;

    /// Parameters to submit in response to a `ChallengeStatus` the
    /// server returned instead of `SUCCESS`/`FAILURE`. Returns `None` to
    /// give up on the challenge.
    fn next(&mut self, challenge_status: &str) -> Option<Vec<ChallengeParameter>>;
}

/// The trivial challenge: proves nothing, always succeeds. Useful for CAs
/// that gate issuance on the Interest's own signature alone.
pub struct NopChallenge;

impl Challenge for NopChallenge {
    fn id(&self) -> &'static str {
        challenge_consts::NOP
    }
    fn start(&mut self) -> Vec<ChallengeParameter> {
        Vec::new()
    }
    fn next(&mut self, _challenge_status: &str) -> Option<Vec<ChallengeParameter>> {
        None
    }
}

/// Proves possession of a previously issued certificate by presenting it
/// and, once challenged with a nonce, a proof derived from its private
/// key. The nonce/proof relationship is left to the caller: this struct
/// only carries the already-computed `proof` bytes.
pub struct PossessionChallenge {
    pub issued_cert: Vec<u8>,
    pub proof: Vec<u8>,
}

impl Challenge for PossessionChallenge {
    fn id(&self) -> &'static str {
        challenge_consts::POSSESSION
    }
    fn start(&mut self) -> Vec<ChallengeParameter> {
        vec![ChallengeParameter {
            key: challenge_consts::ISSUED_CERT.to_string(),
            value: self.issued_cert.clone(),
        }]
    }
    fn next(&mut self, challenge_status: &str) -> Option<Vec<ChallengeParameter>> {
        if challenge_status == challenge_consts::NONCE {
            Some(vec![ChallengeParameter {
                key: challenge_consts::PROOF.to_string(),
                value: self.proof.clone(),
            }])
        } else {
            None
        }
    }
}

/// A validated CA profile: the prefix certificates are issued under, the
/// CA's own certificate, and the maximum validity period it will grant.
pub struct CaProfile {
    pub prefix: Vec<u8>,
    pub max_validity_period: u64,
    pub ca_certificate: Vec<u8>,
    pub ca_public_key: EcdsaPublicKey,
}

impl CaProfile {
    /// Parses and verifies a CA profile Data packet (`<prefix>/CA/INFO/
    /// <version>/<segment=0>`), trusting the certificate it embeds.
    pub fn from_data(data: &Data<'_>) -> Option<CaProfile> {
        let mut ca_prefix: Option<Vec<u8>> = None;
        let mut max_validity_period = 0u64;
        let mut ca_certificate: Option<Vec<u8>> = None;
        ndnstack_tlv::ev_decoder::decode_value(
            ndnstack_tlv::Decoder::new(data.content),
            vec![
                ndnstack_tlv::ElementDef::new(tt::CA_PREFIX, |d| {
                    ca_prefix = Some(d.value.to_vec())
                })
                .with_order(100),
                ndnstack_tlv::ElementDef::ignore(tt::CA_INFO).with_order(200),
                ndnstack_tlv::ElementDef::fallible(tt::MAX_VALIDITY_PERIOD, |d| {
                    match ndnstack_tlv::nni::decode(d, u64::MAX) {
                        Ok(v) => {
                            max_validity_period = v;
                            true
                        }
                        Err(_) => false,
                    }
                })
                .with_order(300),
                ndnstack_tlv::ElementDef::new(tt::CA_CERTIFICATE, |d| {
                    ca_certificate = Some(d.value.to_vec())
                })
                .with_order(400),
            ],
        )
        .ok()?;

        let ca_certificate = ca_certificate?;
        let (cert_tlv, _) = ndnstack_tlv::Tlv::read(&ca_certificate).ok()?;
        let cert_data = Data::decode(&cert_tlv).ok()?;
        let ca_public_key = crate::cert::subject_public_key(&cert_data)?;
        if !cert_data.verify(&ca_public_key) {
            return None;
        }
        if !data.verify(&ca_public_key) {
            return None;
        }

        Some(CaProfile {
            prefix: ca_prefix?,
            max_validity_period,
            ca_certificate,
            ca_public_key,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    NewReq,
    NewRes,
    ChallengeReq,
    ChallengeRes,
    Success,
    Failure,
}

/// Drives one certificate-request exchange against a single CA, from
/// the NEW Interest through however many CHALLENGE round trips the
/// selected challenge needs.
pub struct Session {
    profile: CaProfile,
    subject_key: EcdsaPrivateKey,
    /// `(notBefore, notAfter)`, Unix seconds, carried in the self-signed
    /// CertRequest. The server is not bound to honor it (see
    /// [`crate::cert::max_validity_period`]).
    requested_validity: (u64, u64),
    ecdh_secret: Option<EphemeralSecret>,
    session_key: Option<SessionKey>,
    request_id: Vec<u8>,
    salt: Vec<u8>,
    challenge: Box<dyn Challenge>,
    prev_challenge_id: Option<&'static str>,
    /// Parameters to submit on the next CHALLENGE request. `None` means
    /// "ask the challenge to start fresh"; set from `Challenge::next`
    /// after a `CHALLENGE`/`PENDING` response.
    pending_params: Option<Vec<ChallengeParameter>>,
    state: State,
    deadline: Instant,
    issued_cert_name: Option<Vec<u8>>,
}

impl Session {
    pub fn new(
        profile: CaProfile,
        subject_key: EcdsaPrivateKey,
        requested_validity: (u64, u64),
        challenge: Box<dyn Challenge>,
    ) -> Session {
        Session {
            profile,
            subject_key,
            requested_validity,
            ecdh_secret: None,
            session_key: None,
            request_id: Vec::new(),
            salt: Vec::new(),
            challenge,
            prev_challenge_id: None,
            pending_params: None,
            state: State::NewReq,
            deadline: Instant::now() + STEP_DEADLINE,
            issued_cert_name: None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Success | State::Failure)
    }

    pub fn succeeded(&self) -> bool {
        self.state == State::Success
    }

    pub fn issued_cert_name(&self) -> Option<&[u8]> {
        self.issued_cert_name.as_deref()
    }

    pub fn timed_out(&self) -> bool {
        !self.is_done() && Instant::now() >= self.deadline
    }

    pub fn fail_timeout(&mut self) {
        if !self.is_done() {
            self.state = State::Failure;
        }
    }

    /// Builds the NEW Interest, wire-encoded into `out`.
    pub fn make_new_interest<'b>(&mut self, region: &'b Region<'b>) -> Option<&'b [u8]> {
        let ecdh_secret = EphemeralSecret::random(&mut OsRng);
        let ecdh_pub_point = ecdh_secret.public_key().to_sec1_bytes();
        let spki = self.subject_key.public_key().to_public_key_der()?;

        // CertRequest: a self-signed Data proposing the new key and its
        // requested ValidityPeriod, not yet a real certificate name.
        let cert_request_region = region.sub_region(region.available() / 4)?;
        let request_comp = Component::generic(&cert_request_region, b"cert-request")?;
        let request_name = Name::empty().append(&cert_request_region, &[request_comp])?;
        let spki_buf = cert_request_region.alloc(spki.len())?;
        spki_buf.copy_from_slice(&spki);
        let mut cert_request = Data::new(request_name);
        cert_request.content = spki_buf;
        let cert_request_wire = cert_request.encode_signed_with_validity(
            &cert_request_region,
            &self.subject_key,
            Some(self.requested_validity),
        )?;

        let scratch = region.sub_region(region.available() / 4)?;
        let mut app_params_enc = ndnstack_tlv::Encoder::new(&scratch)?;
        app_params_enc.prepend_tlv(tt::CERT_REQUEST, false, |e| {
            e.prepend_bytes(cert_request_wire);
        });
        app_params_enc.prepend_tlv(tt::ECDH_PUB, false, |e| {
            e.prepend_bytes(&ecdh_pub_point);
        });
        let app_params = app_params_enc.trim();

        let ca_name = Name::from_value(crate::common::copy_into(region, &self.profile.prefix)?).ok()?;
        let new_comp = Component::generic(region, an::NEW_COMPONENT)?;
        let name = ca_name.append(region, &[new_comp])?;
        let interest = Interest::new(name);
        let wire = interest.encode_signed(region, app_params, &self.subject_key)?;

        self.ecdh_secret = Some(ecdh_secret);
        self.deadline = Instant::now() + STEP_DEADLINE;
        self.state = State::NewRes;
        Some(wire)
    }

    /// Processes the server's NEW response Data.
    pub fn handle_new_data(&mut self, data: &Data<'_>) -> bool {
        if self.state != State::NewRes {
            return false;
        }
        if !data.verify(&self.profile.ca_public_key) {
            self.state = State::Failure;
            return true;
        }

        let mut ecdh_pub: Option<Vec<u8>> = None;
        let mut salt: Option<Vec<u8>> = None;
        let mut request_id: Option<Vec<u8>> = None;
        let mut offered: Vec<Vec<u8>> = Vec::new();
        let decoded = ndnstack_tlv::ev_decoder::decode_value(
            ndnstack_tlv::Decoder::new(data.content),
            vec![
                ndnstack_tlv::ElementDef::new(tt::ECDH_PUB, |d| ecdh_pub = Some(d.value.to_vec()))
                    .with_order(100),
                ndnstack_tlv::ElementDef::new(tt::SALT, |d| salt = Some(d.value.to_vec()))
                    .with_order(200),
                ndnstack_tlv::ElementDef::new(tt::REQUEST_ID, |d| {
                    request_id = Some(d.value.to_vec())
                })
                .with_order(300),
                ndnstack_tlv::ElementDef::new(tt::CHALLENGE, |d| offered.push(d.value.to_vec()))
                    .repeatable()
                    .with_order(400),
            ],
        )
        .is_ok();

        let (Some(ecdh_pub), Some(salt), Some(request_id)) = (ecdh_pub, salt, request_id) else {
            self.state = State::Failure;
            return true;
        };
        if !decoded || !offered.iter().any(|c| c == self.challenge.id().as_bytes()) {
            self.state = State::Failure;
            return true;
        }

        let Some(peer_point) = EcdhPublicKey::from_sec1_bytes(&ecdh_pub).ok() else {
            self.state = State::Failure;
            return true;
        };
        let Some(local_secret) = self.ecdh_secret.take() else {
            self.state = State::Failure;
            return true;
        };
        let Some(session_key) = SessionKey::derive(
            &local_secret,
            &peer_point,
            &salt,
            &request_id,
            Role::Requester,
        ) else {
            self.state = State::Failure;
            return true;
        };

        self.session_key = Some(session_key);
        self.salt = salt;
        self.request_id = request_id;
        self.deadline = Instant::now() + STEP_DEADLINE;
        self.state = State::ChallengeReq;
        true
    }

    /// Builds the next CHALLENGE Interest, using `self.challenge`'s
    /// current parameters.
    pub fn make_challenge_interest<'b>(&mut self, region: &'b Region<'b>) -> Option<&'b [u8]> {
        if self.state != State::ChallengeReq {
            return None;
        }
        let session_key = self.session_key.as_mut()?;

        let params = match self.pending_params.take() {
            Some(params) => params,
            None if self.prev_challenge_id.is_none() => self.challenge.start(),
            None => return None,
        };
        self.prev_challenge_id = Some(self.challenge.id());

        let plain_region = region.sub_region(region.available() / 2)?;
        let mut plain_enc = ndnstack_tlv::Encoder::new(&plain_region)?;
        for param in params.iter().rev() {
            plain_enc.prepend_tlv(tt::PARAMETER_VALUE, false, |e| {
                e.prepend_bytes(&param.value);
            });
            plain_enc.prepend_tlv(tt::PARAMETER_KEY, false, |e| {
                e.prepend_bytes(param.key.as_bytes());
            });
        }
        plain_enc.prepend_tlv(tt::SELECTED_CHALLENGE, false, |e| {
            e.prepend_bytes(self.challenge.id().as_bytes());
        });
        let plaintext = plain_enc.trim();

        let frame = session_key.encrypt(&self.request_id, plaintext)?;
        let mut app_params_enc = ndnstack_tlv::Encoder::new(region)?;
        frame.encode_to(&mut app_params_enc);
        let app_params = app_params_enc.trim();

        let ca_name = Name::from_value(crate::common::copy_into(region, &self.profile.prefix)?).ok()?;
        let challenge_comp = Component::generic(region, an::CHALLENGE_COMPONENT)?;
        let request_id_comp = Component::generic(region, &self.request_id)?;
        let name = ca_name.append(region, &[challenge_comp, request_id_comp])?;
        let interest = Interest::new(name);
        let wire = interest.encode_signed(region, app_params, &self.subject_key)?;

        self.deadline = Instant::now() + STEP_DEADLINE;
        self.state = State::ChallengeRes;
        Some(wire)
    }

    /// Processes a CHALLENGE response Data. Returns `true` once the
    /// session has reached a terminal state.
    pub fn handle_challenge_data(&mut self, data: &Data<'_>) -> bool {
        if self.state != State::ChallengeRes {
            return false;
        }
        if !data.verify(&self.profile.ca_public_key) {
            self.state = State::Failure;
            return true;
        }
        let Some(session_key) = self.session_key.as_mut() else {
            self.state = State::Failure;
            return true;
        };
        let Ok(frame) = EncryptedFrame::decode(data.content) else {
            self.state = State::Failure;
            return true;
        };
        let Some(plaintext) = session_key.decrypt(&self.request_id, &frame) else {
            self.state = State::Failure;
            return true;
        };

        let mut status = Status::Failure;
        let mut challenge_status = String::new();
        let mut issued_cert_name: Option<Vec<u8>> = None;
        let decoder = ndnstack_tlv::Decoder::new(&plaintext);
        let _ = ndnstack_tlv::ev_decoder::decode_value(
            decoder,
            vec![
                ndnstack_tlv::ElementDef::fallible(tt::STATUS, |d| {
                    match ndnstack_tlv::nni::decode(d, u64::MAX) {
                        Ok(v) => {
                            status = Status::from_wire(v);
                            true
                        }
                        Err(_) => false,
                    }
                })
                .with_order(100),
                ndnstack_tlv::ElementDef::new(tt::CHALLENGE_STATUS, |d| {
                    challenge_status = String::from_utf8_lossy(d.value).into_owned();
                })
                .with_order(200),
                ndnstack_tlv::ElementDef::ignore(tt::REMAINING_TRIES).with_order(300),
                ndnstack_tlv::ElementDef::ignore(tt::REMAINING_TIME).with_order(400),
                ndnstack_tlv::ElementDef::new(tt::ISSUED_CERT_NAME, |d| {
                    issued_cert_name = Some(d.value.to_vec())
                })
                .with_order(500),
            ],
        );

        match status {
            Status::Success => {
                self.issued_cert_name = issued_cert_name;
                self.state = State::Success;
            }
            Status::Challenge | Status::Pending => match self.challenge.next(&challenge_status) {
                Some(params) => {
                    self.pending_params = Some(params);
                    self.state = State::ChallengeReq;
                    self.deadline = Instant::now() + STEP_DEADLINE;
                }
                None => self.state = State::Failure,
            },
            _ => self.state = State::Failure,
        }
        self.is_done()
    }
}

/// A [`PacketHandler`] that drives one [`Session`] to completion,
/// sending each request as soon as the previous response authorizes it.
pub struct Client {
    session: Session,
    scratch: Box<[u8]>,
}

impl Client {
    pub fn new(session: Session) -> Client {
        Client {
            session,
            scratch: vec![0u8; 4096].into_boxed_slice(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sends the initial NEW Interest, kicking off the exchange.
    pub fn start(&mut self, face: &dyn FaceApi) -> bool {
        let region = Region::new(&mut self.scratch);
        match self.session.make_new_interest(&region) {
            Some(wire) => face.send(&region, wire, 0, 0),
            None => {
                self.session.fail_timeout();
                false
            }
        }
    }

    fn advance(&mut self, face: &dyn FaceApi) {
        if self.session.is_done() {
            return;
        }
        let region = Region::new(&mut self.scratch);
        if let Some(wire) = self.session.make_challenge_interest(&region) {
            face.send(&region, wire, 0, 0);
        }
    }
}

impl PacketHandler for Client {
    fn process_data(&mut self, face: &dyn FaceApi, data: &Data<'_>) -> bool {
        if self.session.is_done() {
            return false;
        }
        if self.session.handle_new_data(data) {
            self.advance(face);
            return true;
        }
        if self.session.handle_challenge_data(data) {
            self.advance(face);
            return true;
        }
        false
    }

    fn loop_tick(&mut self, _face: &dyn FaceApi) {
        if self.session.timed_out() {
            self.session.fail_timeout();
        }
    }
}

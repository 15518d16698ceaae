// Copyright 2025 The kmesh Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use rand::Rng;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    FieldCount,
    FieldLength,
    InvalidHex,
    InvalidFlags,
    ZeroTraceId,
    ZeroSpanId,
}

impl Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reason::FieldCount => "wrong number of fields",
            Reason::FieldLength => "field has the wrong length",
            Reason::InvalidHex => "invalid hex digit",
            Reason::InvalidFlags => "invalid trace flags",
            Reason::ZeroTraceId => "all-zero trace id",
            Reason::ZeroSpanId => "all-zero span id",
        })
    }
}

/// The only failure of the header codecs. A malformed header is a routine condition:
/// the request simply does not continue an existing trace.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("malformed trace header: {0}")]
pub struct MalformedHeader(Reason);

impl MalformedHeader {
    pub fn reason(&self) -> Reason {
        self.0
    }
}

impl From<Reason> for MalformedHeader {
    fn from(reason: Reason) -> Self {
        MalformedHeader(reason)
    }
}

// Checks the exact width and charset of a hex field. `from_str_radix` alone would
// accept a leading `+`.
pub(crate) fn hex_field(field: &str, width: usize) -> Result<&str, MalformedHeader> {
    if field.len() != width {
        return Err(Reason::FieldLength.into());
    }
    if !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Reason::InvalidHex.into());
    }
    Ok(field)
}

/// 16-byte trace identifier, stored big-endian.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TraceId(u128);

impl TraceId {
    pub const INVALID: TraceId = TraceId(0);

    pub const fn from_u128(id: u128) -> Self {
        TraceId(id)
    }

    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        TraceId(u128::from_be_bytes(bytes))
    }

    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Parses exactly 32 hex digits. Zero is accepted here, the codecs reject it.
    pub fn from_hex(s: &str) -> Result<Self, MalformedHeader> {
        let field = hex_field(s, 32)?;
        u128::from_str_radix(field, 16).map(TraceId).map_err(|_| Reason::InvalidHex.into())
    }

    // Root traces take their id from a v4 uuid, which is never zero.
    pub(crate) fn random() -> Self {
        TraceId(uuid::Uuid::new_v4().as_u128())
    }
}

impl Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TraceId({self})")
    }
}

/// 8-byte span identifier, stored big-endian.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpanId(u64);

impl SpanId {
    pub const INVALID: SpanId = SpanId(0);

    pub const fn from_u64(id: u64) -> Self {
        SpanId(id)
    }

    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        SpanId(u64::from_be_bytes(bytes))
    }

    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Parses exactly 16 hex digits. Zero is accepted here, the codecs reject it.
    pub fn from_hex(s: &str) -> Result<Self, MalformedHeader> {
        let field = hex_field(s, 16)?;
        u64::from_str_radix(field, 16).map(SpanId).map_err(|_| Reason::InvalidHex.into())
    }

    pub(crate) fn random() -> Self {
        SpanId(rand::rng().random_range(1..=u64::MAX))
    }
}

impl Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpanId({self})")
    }
}

/// Trace flags byte. Only bit 0 (sampled) has a meaning, the other bits are carried as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TraceFlags(u8);

impl TraceFlags {
    pub const SAMPLED: TraceFlags = TraceFlags(0x01);

    pub const fn new(bits: u8) -> Self {
        TraceFlags(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_sampled(self) -> bool {
        self.0 & Self::SAMPLED.0 != 0
    }

    #[must_use]
    pub const fn with_sampled(self, sampled: bool) -> Self {
        if sampled {
            TraceFlags(self.0 | Self::SAMPLED.0)
        } else {
            TraceFlags(self.0 & !Self::SAMPLED.0)
        }
    }

    pub fn from_hex(s: &str) -> Result<Self, MalformedHeader> {
        let field = hex_field(s, 2)?;
        u8::from_str_radix(field, 16).map(TraceFlags).map_err(|_| Reason::InvalidHex.into())
    }
}

impl Display for TraceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

/// The identity a new span links to as its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpanContext {
    trace_id: TraceId,
    span_id: SpanId,
    trace_flags: TraceFlags,
}

impl SpanContext {
    pub const fn new(trace_id: TraceId, span_id: SpanId, trace_flags: TraceFlags) -> Self {
        SpanContext { trace_id, span_id, trace_flags }
    }

    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    pub fn span_id(&self) -> SpanId {
        self.span_id
    }

    pub fn trace_flags(&self) -> TraceFlags {
        self.trace_flags
    }

    pub fn is_sampled(&self) -> bool {
        self.trace_flags.is_sampled()
    }

    pub fn is_valid(&self) -> bool {
        self.trace_id.is_valid() && self.span_id.is_valid()
    }

    pub(crate) fn validated(self) -> Result<Self, MalformedHeader> {
        if !self.trace_id.is_valid() {
            return Err(Reason::ZeroTraceId.into());
        }
        if !self.span_id.is_valid() {
            return Err(Reason::ZeroSpanId.into());
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE_BYTES: [u8; 16] = [75, 249, 47, 53, 119, 179, 77, 166, 163, 206, 146, 157, 14, 14, 71, 54];
    const SPAN_BYTES: [u8; 8] = [0, 240, 103, 170, 11, 169, 2, 183];

    #[test]
    fn trace_id_from_bytes_matches_hex() {
        let trace_id = TraceId::from_bytes(TRACE_BYTES);
        assert_eq!(trace_id, TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap());
        assert_eq!(trace_id.to_string(), "4bf92f3577b34da6a3ce929d0e0e4736");
        assert_eq!(trace_id.to_bytes(), TRACE_BYTES);
    }

    #[test]
    fn span_id_keeps_leading_zeros() {
        let span_id = SpanId::from_bytes(SPAN_BYTES);
        assert_eq!(span_id.to_string(), "00f067aa0ba902b7");
        assert_eq!(span_id, SpanId::from_hex("00f067aa0ba902b7").unwrap());
    }

    #[test]
    fn from_hex_accepts_uppercase() {
        assert_eq!(
            TraceId::from_hex("4BF92F3577B34DA6A3CE929D0E0E4736").unwrap(),
            TraceId::from_u128(0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736)
        );
    }

    #[test]
    fn from_hex_rejects_sign_and_length() {
        assert_eq!(SpanId::from_hex("+0f067aa0ba902b7").unwrap_err().reason(), Reason::InvalidHex);
        assert_eq!(SpanId::from_hex("0f067aa0ba902b7").unwrap_err().reason(), Reason::FieldLength);
        assert_eq!(TraceId::from_hex("").unwrap_err().reason(), Reason::FieldLength);
        assert_eq!(TraceFlags::from_hex("0g").unwrap_err().reason(), Reason::InvalidHex);
    }

    #[test]
    fn trace_flags_sampled_bit() {
        let flags = TraceFlags::new(0x0a);
        assert!(!flags.is_sampled());
        assert_eq!(flags.with_sampled(true).bits(), 0x0b);
        assert_eq!(flags.with_sampled(true).with_sampled(false), flags);
        assert_eq!(TraceFlags::SAMPLED.to_string(), "01");
    }

    #[test]
    fn default_span_context_is_invalid() {
        let sc = SpanContext::default();
        assert!(!sc.is_valid());
        assert_eq!(sc.validated().unwrap_err().reason(), Reason::ZeroTraceId);

        let sc = SpanContext::new(TraceId::from_bytes(TRACE_BYTES), SpanId::INVALID, TraceFlags::SAMPLED);
        assert_eq!(sc.validated().unwrap_err().reason(), Reason::ZeroSpanId);
    }

    #[test]
    fn random_ids_are_valid() {
        for _ in 0..64 {
            assert!(TraceId::random().is_valid());
            assert!(SpanId::random().is_valid());
        }
        assert_ne!(SpanId::random(), SpanId::random());
    }

    #[test]
    fn error_message_names_reason() {
        let err = MalformedHeader::from(Reason::ZeroSpanId);
        assert_eq!(err.to_string(), "malformed trace header: all-zero span id");
    }
}

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

//! Codec for the W3C `traceparent` header value:
//! `VV-TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTT-SSSSSSSSSSSSSSSS-FF`.
//!
//! Only version `00` is ever written. Any two-digit version is accepted on read so
//! that newer producers are not rejected; the version itself is not retained.

use crate::span_context::{hex_field, MalformedHeader, Reason, SpanContext, SpanId, TraceFlags, TraceId};

pub const VERSION: u8 = 0;
pub const ENCODED_LEN: usize = 55;
const DELIMITER: char = '-';

pub fn encode(span_context: &SpanContext) -> String {
    format!(
        "{VERSION:02x}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags()
    )
}

pub fn decode(header: &str) -> Result<SpanContext, MalformedHeader> {
    let mut fields = header.split(DELIMITER);
    let (Some(version), Some(trace_id), Some(span_id), Some(flags), None) =
        (fields.next(), fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Reason::FieldCount.into());
    };

    hex_field(version, 2)?;
    let trace_id = TraceId::from_hex(trace_id)?;
    let span_id = SpanId::from_hex(span_id)?;
    let trace_flags = TraceFlags::from_hex(flags)?;

    SpanContext::new(trace_id, span_id, trace_flags).validated()
}

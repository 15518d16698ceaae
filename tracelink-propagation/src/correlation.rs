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

//! Legacy correlation token: `<32 hex trace id>.<16 hex span id>.<decimal flags>`.
//!
//! Only kept for peers that predate `traceparent`. New code paths read and write
//! [`crate::traceparent`] first.

use crate::span_context::{MalformedHeader, Reason, SpanContext, SpanId, TraceFlags, TraceId};

const DELIMITER: char = '.';

pub fn encode(span_context: &SpanContext) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().bits()
    )
}

pub fn decode(token: &str) -> Result<SpanContext, MalformedHeader> {
    let mut fields = token.trim_ascii().split(DELIMITER);
    let (Some(trace_id), Some(span_id), Some(flags), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Reason::FieldCount.into());
    };

    let trace_id = TraceId::from_hex(trace_id)?;
    let span_id = SpanId::from_hex(span_id)?;
    let trace_flags = decimal_flags(flags)?;

    SpanContext::new(trace_id, span_id, trace_flags).validated()
}

fn decimal_flags(field: &str) -> Result<TraceFlags, MalformedHeader> {
    if field.is_empty() || field.len() > 3 {
        return Err(Reason::FieldLength.into());
    }
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Reason::InvalidFlags.into());
    }
    field.parse::<u8>().map(TraceFlags::new).map_err(|_| Reason::InvalidFlags.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SpanContext {
        SpanContext::new(
            TraceId::from_bytes([1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 4, 8, 16, 32, 64, 128]),
            SpanId::from_bytes([1, 2, 4, 8, 16, 32, 64, 128]),
            TraceFlags::default(),
        )
    }

    #[test]
    fn encode_valid() {
        assert_eq!(encode(&sample()), "01020304050607080102040810204080.0102040810204080.0");
    }

    #[test]
    fn decode_valid() {
        assert_eq!(decode("01020304050607080102040810204080.0102040810204080.0"), Ok(sample()));
        let sc = decode("4bf92f3577b34da6a3ce929d0e0e4736.00f067aa0ba902b7.1").unwrap();
        assert!(sc.is_sampled());
    }

    #[test]
    fn decode_trims_padding() {
        assert_eq!(decode("  01020304050607080102040810204080.0102040810204080.0\t"), Ok(sample()));
    }

    #[test]
    fn decode_zero_ids() {
        let err = decode("00000000000000000000000000000000.0102040810204080.1").unwrap_err();
        assert_eq!(err.reason(), Reason::ZeroTraceId);
        let err = decode("01020304050607080102040810204080.0000000000000000.1").unwrap_err();
        assert_eq!(err.reason(), Reason::ZeroSpanId);
    }

    #[test]
    fn decode_bad_flags() {
        let prefix = "01020304050607080102040810204080.0102040810204080.";
        assert_eq!(decode(&format!("{prefix}256")).unwrap_err().reason(), Reason::InvalidFlags);
        assert_eq!(decode(&format!("{prefix}0x1")).unwrap_err().reason(), Reason::InvalidFlags);
        assert_eq!(decode(&format!("{prefix}-1")).unwrap_err().reason(), Reason::InvalidFlags);
        assert_eq!(decode(&format!("{prefix}1000")).unwrap_err().reason(), Reason::FieldLength);
        assert_eq!(decode(prefix).unwrap_err().reason(), Reason::FieldLength);
    }

    #[test]
    fn decode_malformed() {
        for token in [
            "",
            "01020304050607080102040810204080.0102040810204080",
            "01020304050607080102040810204080.0102040810204080.1.1",
            "01020304050607080102040810204080-0102040810204080-1",
            "0102030405060708010204081020408.0102040810204080.1",
            "01020304050607080102040810204080.010204081020408z.1",
        ] {
            assert!(decode(token).is_err(), "{token:?} should not decode");
        }
    }

    #[test]
    fn round_trip() {
        for flags in [0u8, 1, 0x80, 0xff] {
            let sc = SpanContext::new(
                TraceId::from_u128(0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736),
                SpanId::from_u64(0x00f0_67aa_0ba9_02b7),
                TraceFlags::new(flags),
            );
            assert_eq!(decode(&encode(&sc)), Ok(sc));
        }
    }
}

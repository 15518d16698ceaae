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

use tracelink_configuration::config::TracingSpec;
use tracelink_http_header::{TRACEPARENT, X_CORRELATION_ID};
use tracing::debug;

use crate::{correlation, header_bag::HeaderBag, span_context::SpanContext, traceparent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectOptions {
    /// Also write `x-correlation-id` next to `traceparent`.
    pub correlation_header: bool,
}

impl From<&TracingSpec> for InjectOptions {
    fn from(spec: &TracingSpec) -> Self {
        InjectOptions { correlation_header: spec.correlation_header }
    }
}

/// Reads the parent span context of an inbound message.
///
/// `traceparent` wins when it decodes; otherwise the legacy `x-correlation-id` token is
/// tried. `None` means the caller is not part of a trace and a new root should be started,
/// it is never an error for the request.
pub fn extract_from_headers<H: HeaderBag + ?Sized>(headers: &H) -> Option<SpanContext> {
    if let Some(value) = headers.get(&TRACEPARENT) {
        match traceparent::decode(value) {
            Ok(span_context) => return Some(span_context),
            Err(e) => debug!("ignoring {TRACEPARENT} header {value:?}: {e}"),
        }
    }

    if let Some(value) = headers.get(&X_CORRELATION_ID) {
        match correlation::decode(value) {
            Ok(span_context) => return Some(span_context),
            Err(e) => debug!("ignoring {X_CORRELATION_ID} header {value:?}: {e}"),
        }
    }

    None
}

/// Writes `span_context` into the headers of an outbound request or a response.
///
/// Existing values are overwritten, never duplicated. Both headers, when written, are
/// encoded from the same value.
pub fn inject_into_headers<H: HeaderBag + ?Sized>(
    span_context: &SpanContext,
    headers: &mut H,
    options: InjectOptions,
) {
    headers.set(TRACEPARENT, &traceparent::encode(span_context));
    if options.correlation_header {
        headers.set(X_CORRELATION_ID, &correlation::encode(span_context));
    }
}

// SPDX-FileCopyrightText: © 2025 kmesh authors
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 kmesh authors
//
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

//! Trace context propagation over HTTP.
//!
//! Inbound requests are read with [`extract_from_headers`] (or [`Context::from_headers`]),
//! which prefers the W3C `traceparent` header and falls back to the legacy
//! `x-correlation-id` token. Outbound requests and responses are written with
//! [`inject_into_headers`], usually through [`HttpTracer::start_client_span`].

pub mod context;
pub mod correlation;
pub mod header_bag;
pub mod http_tracer;
pub mod propagation;
pub mod sampler;
pub mod span_context;
pub mod traceparent;
pub mod tracer;

pub use context::Context;
pub use header_bag::HeaderBag;
pub use http_tracer::{start_client_span_from_context, HttpTracer};
pub use propagation::{extract_from_headers, inject_into_headers, InjectOptions};
pub use sampler::Sampler;
pub use span_context::{MalformedHeader, Reason, SpanContext, SpanId, TraceFlags, TraceId};
pub use tracer::{ClientSpan, IdTracer, Span, Tracer};

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

use crate::{header_bag::HeaderBag, propagation::extract_from_headers, span_context::SpanContext};

/// Tracing state of a single request, passed explicitly from the inbound side to the
/// outbound calls it makes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    span_context: Option<SpanContext>,
    remote: bool,
}

impl Context {
    /// Creates a new (root) `Context`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the context of an inbound request. Headers that do not decode leave a root context.
    pub fn from_headers<H: HeaderBag + ?Sized>(headers: &H) -> Self {
        match extract_from_headers(headers) {
            Some(parent) => Self::new().with_remote_parent(parent),
            None => Self::new(),
        }
    }

    /// A span context received from a peer. Invalid (zero) contexts are dropped.
    pub fn with_remote_parent(self, span_context: SpanContext) -> Self {
        let span_context = span_context.is_valid().then_some(span_context);
        Self { remote: span_context.is_some(), span_context }
    }

    /// A span started in this process. Invalid (zero) contexts are dropped.
    pub fn with_span_context(self, span_context: SpanContext) -> Self {
        Self { span_context: span_context.is_valid().then_some(span_context), remote: false }
    }

    #[inline]
    pub fn span_context(&self) -> Option<&SpanContext> {
        self.span_context.as_ref()
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.remote
    }

    #[inline]
    pub fn is_root_node(&self) -> bool {
        self.span_context.is_none()
    }
}

// Copyright 2025 The kmesh Authors
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
//

use http::HeaderName;

macro_rules! custom_header {
    ($(#[$attr:meta])* $const_name:ident, $header_string:literal) => {
        $(#[$attr])*
        pub const $const_name: HeaderName = HeaderName::from_static($header_string);
    };
}

custom_header!(
    /// The `traceparent` header is used for W3C Trace Context
    TRACEPARENT, "traceparent");

custom_header!(
    /// The `x-correlation-id` header carries the legacy `traceid.spanid.flags` token,
    /// understood by peers that predate `traceparent`
    X_CORRELATION_ID, "x-correlation-id");

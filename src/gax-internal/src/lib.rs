// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Implementation details for the Resource Manager client libraries.
//!
//! <div class="warning">
//! All the types, traits, and functions defined in this crate are <b>not</b>
//! intended for general use. The APIs will remain unstable for the
//! foreseeable future. Applications should use the
//! <code>Pipeline</code> trait in <code>arm-gax</code> instead.
//! </div>

pub mod api_header;

pub mod http;

pub mod options;

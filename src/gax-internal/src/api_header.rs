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

//! Telemetry header helpers.

mod build_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/build_env.rs"));

    pub(crate) const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// The name used to identify these libraries in the `user-agent` header.
pub const LIBRARY_NAME: &str = "arm-rust";

/// Format the value of the `user-agent` header.
///
/// The value identifies the library version and the compiler used to build
/// it. Applications may append their own product token via `suffix`.
pub fn user_agent(suffix: Option<&str>) -> String {
    // Strip out the initial "rustc " string from `RUSTC_VERSION`. If not
    // found, leave RUSTC_VERSION unchanged.
    let rustc_version = build_info::RUSTC_VERSION;
    let rustc_version = rustc_version
        .strip_prefix("rustc ")
        .unwrap_or(build_info::RUSTC_VERSION);

    let value = format!(
        "{LIBRARY_NAME}/{} (rustc {rustc_version})",
        build_info::PKG_VERSION
    );
    match suffix {
        Some(s) if !s.is_empty() => format!("{value} {s}"),
        _ => value,
    }
}

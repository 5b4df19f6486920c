// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod export;
pub mod heuristics;
pub mod kubernetes;
pub mod net;
pub mod resolv;

#[cfg(test)]
pub mod test_utils;
